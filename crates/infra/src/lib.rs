//! Infrastructure layer: SQLite data access and configuration.

pub mod config;
pub mod sqlite;

pub use config::{AppConfig, ConfigError};
pub use sqlite::SqliteDataSource;
