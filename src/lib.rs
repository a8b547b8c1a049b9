//! City information service
//!
//! Aggregates a third-party city data API (city list, insights, weather
//! predictions) with an in-memory store of user-submitted recipes, and
//! exposes the result over a small REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod openapi;
pub mod store;
pub mod submission;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::AppConfig;
pub use error::{AppError, UpstreamError};
pub use store::RecipeStore;
pub use upstream::{CityDataClient, CityDataSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
