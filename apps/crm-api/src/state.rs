//! Application context.
//!
//! Built once in `main` and handed to the route builders; nothing here is
//! global.

use mongodb::{Client, Database};

/// Shared application context.
///
/// Cloning is cheap: the MongoDB client and database handles share one
/// connection pool.
#[derive(Clone)]
pub struct AppContext {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
}
