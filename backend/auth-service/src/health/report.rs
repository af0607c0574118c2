//! Shape of the `/status` reply

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// Outcome of one named probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub name: String,
    pub status: ProbeStatus,
}

/// Report group a probe is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthSection {
    Integrations,
    Databases,
    Rabbitmq,
}

/// Aggregated dependency health
///
/// `service` describes this process and is always `OK` when it can answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: ProbeStatus,
    pub integrations: Vec<ProbeReport>,
    pub databases: Vec<ProbeReport>,
    pub rabbitmq: Vec<ProbeReport>,
}

impl HealthReport {
    pub fn new() -> Self {
        Self {
            service: ProbeStatus::Ok,
            integrations: Vec::new(),
            databases: Vec::new(),
            rabbitmq: Vec::new(),
        }
    }

    pub fn push(&mut self, section: HealthSection, entry: ProbeReport) {
        match section {
            HealthSection::Integrations => self.integrations.push(entry),
            HealthSection::Databases => self.databases.push(entry),
            HealthSection::Rabbitmq => self.rabbitmq.push(entry),
        }
    }
}

impl Default for HealthReport {
    fn default() -> Self {
        Self::new()
    }
}
