//! Database library providing the MongoDB connector used by the CRM services
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, config and health checks
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All database features
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry, retry_with_backoff};
