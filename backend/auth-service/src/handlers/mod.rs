/// HTTP request handlers (REST API)
pub mod auth;
pub mod status;

pub use auth::{sign_in, sign_out, sign_up};
pub use status::{health_check, status};
