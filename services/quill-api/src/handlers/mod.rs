pub mod generate;
pub mod health;
pub mod metrics;
pub mod whoami;

pub use generate::{generate_handler, GenerateRequest, GenerateResponse};
pub use health::{health_handler, HealthResponse};
pub use metrics::metrics_handler;
pub use whoami::{whoami_handler, WhoAmIResponse};
