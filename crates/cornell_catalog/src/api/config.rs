/// Configuration for reaching the class roster API
use super::error::CatalogError;
use std::time::Duration;

pub const HOST_KEY: &str = "CORNELL_API_HOST";
pub const VERSION_KEY: &str = "CORNELL_API_VERSION";
pub const SCHEME_KEY: &str = "CORNELL_API_SCHEME";
pub const DOWNLOAD_LIMIT_KEY: &str = "CORNELL_DOWNLOAD_LIMIT";

/// Maximum number of class fetches in flight at once.
pub const DEFAULT_DOWNLOAD_LIMIT: usize = 20;

/// Settings for the fetcher and collector.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// `https` unless overridden
    pub scheme: String,
    /// API host, e.g. `classes.cornell.edu`
    pub api_host: String,
    /// API version segment of the path, e.g. `2.0`
    pub api_version: String,
    /// Cap on concurrent class fetches across a whole collection run
    pub download_limit: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl CatalogConfig {
    /// Creates a configuration with default limits for the given host and version.
    pub fn new(api_host: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            api_host: api_host.into(),
            api_version: api_version.into(),
            download_limit: DEFAULT_DOWNLOAD_LIMIT,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Loads the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a setting name to
    /// its value.
    ///
    /// # Returns
    /// * `Err(CatalogError::MissingConfig)` - If the host or version is unset or blank
    /// * `Err(CatalogError::InvalidConfig)` - If the download limit is not a positive integer
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CatalogError::MissingConfig {
                    key: key.to_string(),
                })
        };

        let mut config = Self::new(required(HOST_KEY)?, required(VERSION_KEY)?);

        if let Some(scheme) = lookup(SCHEME_KEY).map(|v| v.trim().to_ascii_lowercase()) {
            if scheme != "http" && scheme != "https" {
                return Err(CatalogError::InvalidConfig {
                    key: SCHEME_KEY.to_string(),
                    message: format!("expected `http` or `https`, got `{scheme}`"),
                });
            }
            config.scheme = scheme;
        }

        if let Some(raw) = lookup(DOWNLOAD_LIMIT_KEY) {
            config.download_limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&limit| limit > 0)
                .ok_or_else(|| CatalogError::InvalidConfig {
                    key: DOWNLOAD_LIMIT_KEY.to_string(),
                    message: format!("expected a positive integer, got `{raw}`"),
                })?;
        }

        Ok(config)
    }

    /// Sets the scheme, mainly for pointing at a plain HTTP server.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the concurrent class fetch cap. A limit of zero is raised to one.
    pub fn with_download_limit(mut self, limit: usize) -> Self {
        self.download_limit = limit.max(1);
        self
    }

    /// `{scheme}://{host}/api/{version}`
    pub fn base_url(&self) -> String {
        format!("{}://{}/api/{}", self.scheme, self.api_host, self.api_version)
    }

    /// Full URL of a route, without query parameters.
    pub fn route_url(&self, route: &str) -> String {
        format!("{}/{}.json", self.base_url(), route)
    }
}
