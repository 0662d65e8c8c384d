use std::sync::Arc;

use marquee_catalog::CatalogApi;
use marquee_trending::{AppwriteCollection, AppwriteConfig, DocumentCollection, MemoryCollection};

/// Where the trending tally is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingBackend {
    /// Remote Appwrite collection.
    Appwrite,
    /// Process-local collection, lost on exit.
    Memory,
}

impl TrendingBackend {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "appwrite" => Ok(Self::Appwrite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue {
                var: "TRENDING_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
///
/// Missing credentials are not an error here: requests made without them
/// fail at the transport or auth layer and surface like any other failure.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Catalog API root including the version segment.
    pub catalog_base_url: String,
    /// Bearer token for the catalog API.
    pub catalog_api_key: String,
    /// Prefix for poster paths.
    pub image_base_url: String,
    pub trending_backend: TrendingBackend,
    pub appwrite: AppwriteConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                            |
    /// |-------------------------|------------------------------------|
    /// | `TMDB_API_BASE_URL`     | `https://api.themoviedb.org/3`     |
    /// | `TMDB_API_KEY`          | empty                              |
    /// | `TMDB_IMAGE_BASE_URL`   | `https://image.tmdb.org/t/p/w500`  |
    /// | `APPWRITE_ENDPOINT`     | `https://cloud.appwrite.io/v1`     |
    /// | `APPWRITE_PROJECT_ID`   | empty                              |
    /// | `APPWRITE_DATABASE_ID`  | empty                              |
    /// | `APPWRITE_COLLECTION_ID`| empty                              |
    /// | `APPWRITE_API_KEY`      | unset                              |
    /// | `TRENDING_BACKEND`      | `appwrite`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let required = |key: &'static str| {
            let value = var(key, "");
            if value.is_empty() {
                tracing::warn!(var = key, "Environment variable is not set");
            }
            value
        };

        let trending_backend = TrendingBackend::from_name(&var("TRENDING_BACKEND", "appwrite"))?;

        let catalog_base_url = var("TMDB_API_BASE_URL", "https://api.themoviedb.org/3");
        let catalog_api_key = required("TMDB_API_KEY");
        let image_base_url = var("TMDB_IMAGE_BASE_URL", "https://image.tmdb.org/t/p/w500");

        // Appwrite identifiers only matter when the tally is remote.
        let appwrite_id = |key: &'static str| match trending_backend {
            TrendingBackend::Appwrite => required(key),
            TrendingBackend::Memory => var(key, ""),
        };
        let appwrite = AppwriteConfig {
            endpoint: var("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            project_id: appwrite_id("APPWRITE_PROJECT_ID"),
            database_id: appwrite_id("APPWRITE_DATABASE_ID"),
            collection_id: appwrite_id("APPWRITE_COLLECTION_ID"),
            api_key: Some(var("APPWRITE_API_KEY", "")).filter(|k| !k.is_empty()),
        };

        Ok(Self {
            catalog_base_url,
            catalog_api_key,
            image_base_url,
            trending_backend,
            appwrite,
        })
    }

    /// Catalog client for this configuration.
    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.catalog_base_url.clone(), self.catalog_api_key.clone())
    }

    /// Document collection backing the trending tally.
    pub fn trending_collection(&self) -> Arc<dyn DocumentCollection> {
        match self.trending_backend {
            TrendingBackend::Appwrite => Arc::new(AppwriteCollection::new(self.appwrite.clone())),
            TrendingBackend::Memory => Arc::new(MemoryCollection::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.catalog_api_key, "");
        assert_eq!(config.trending_backend, TrendingBackend::Appwrite);
        assert_eq!(config.appwrite.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(config.appwrite.api_key, None);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = load(&[
            ("TMDB_API_KEY", " token "),
            ("APPWRITE_PROJECT_ID", "proj"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "searches"),
            ("APPWRITE_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.catalog_api_key, "token");
        assert_eq!(config.appwrite.project_id, "proj");
        assert_eq!(config.appwrite.database_id, "db");
        assert_eq!(config.appwrite.collection_id, "searches");
        assert_eq!(config.appwrite.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = load(&[("TMDB_API_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.catalog_base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn memory_backend_is_selectable() {
        let config = load(&[("TRENDING_BACKEND", "Memory")]).unwrap();
        assert_eq!(config.trending_backend, TrendingBackend::Memory);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = load(&[("TRENDING_BACKEND", "redis")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for TRENDING_BACKEND: 'redis'");
        assert_matches!(err, ConfigError::InvalidValue { var: "TRENDING_BACKEND", .. });
    }

    #[test]
    fn catalog_client_uses_configured_base() {
        let config = load(&[("TMDB_API_BASE_URL", "http://localhost:9000/3/")]).unwrap();
        assert_eq!(config.catalog().base_url(), "http://localhost:9000/3");
    }
}
