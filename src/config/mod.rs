//! Configuration: YAML file, environment override, validation.

pub mod schema;

pub use schema::{AnalyticsConfig, DatabaseConfig, SocialGraphConfig, DB_ENV_VAR};
