//! Dependency health reporting

pub mod aggregator;
pub mod checks;
pub mod error;
pub mod report;

pub use aggregator::HealthAggregator;
pub use checks::{BrokerHealthCheck, HealthCheck, IdentityProviderHealthCheck, PostgresHealthCheck};
pub use error::HealthCheckError;
pub use report::{HealthReport, HealthSection, ProbeReport, ProbeStatus};
