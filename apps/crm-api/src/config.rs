use core_config::{AppInfo, FromEnv, app_info, http::HttpConfig, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));
        let server = ServerConfig::from_env()?;
        let http = HttpConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            http,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_mongodb_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL", "DATABASE_URL"], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGODB_URL"));
        });
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
                ("PAGINATION_DEFAULT_LIMIT", None),
                ("PORT", Some("8080")),
            ],
            || {
                let config = Config::from_env().unwrap();

                assert_eq!(config.app.name, "unified_crm_api");
                assert_eq!(config.mongodb.database(), database::mongodb::DEFAULT_DATABASE);
                assert_eq!(config.mongodb.app_name.as_deref(), Some("unified_crm_api"));
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.http.default_page_limit, 25);
            },
        );
    }
}
