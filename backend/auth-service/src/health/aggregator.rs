//! Concurrent dependency probing for the status endpoint

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::checks::HealthCheck;
use super::error::HealthCheckError;
use super::report::{HealthReport, HealthSection, ProbeReport, ProbeStatus};

struct Probe {
    section: HealthSection,
    name: String,
    check: Arc<dyn HealthCheck>,
}

/// Runs every declared probe and folds the outcomes into a [`HealthReport`].
///
/// Each probe runs on its own task under a timeout. A probe that fails, panics
/// or overruns only marks its own entry `ERROR`; `status` itself never fails.
pub struct HealthAggregator {
    probes: Vec<Probe>,
    timeout: Duration,
}

impl HealthAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            probes: Vec::new(),
            timeout,
        }
    }

    /// Declare a probe. Report entries follow declaration order.
    pub fn with_probe(
        mut self,
        section: HealthSection,
        name: impl Into<String>,
        check: Arc<dyn HealthCheck>,
    ) -> Self {
        self.probes.push(Probe {
            section,
            name: name.into(),
            check,
        });
        self
    }

    pub async fn status(&self) -> HealthReport {
        let handles = self.probes.iter().map(|probe| {
            let check = Arc::clone(&probe.check);
            let timeout = self.timeout;
            tokio::spawn(async move {
                match tokio::time::timeout(timeout, check.check()).await {
                    Ok(result) => result,
                    Err(_) => Err(HealthCheckError::Timeout(timeout)),
                }
            })
        });

        let outcomes = join_all(handles).await;

        let mut report = HealthReport::new();
        for (probe, outcome) in self.probes.iter().zip(outcomes) {
            let result = outcome
                .map_err(|e| HealthCheckError::Aborted(e.to_string()))
                .and_then(|result| result);

            let status = match result {
                Ok(()) => {
                    debug!(probe = %probe.name, "Health probe passed");
                    ProbeStatus::Ok
                }
                Err(e) => {
                    warn!(probe = %probe.name, error = %e, "Health probe failed");
                    ProbeStatus::Error
                }
            };

            report.push(
                probe.section,
                ProbeReport {
                    name: probe.name.clone(),
                    status,
                },
            );
        }

        report
    }
}
