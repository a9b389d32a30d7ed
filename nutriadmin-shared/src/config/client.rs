use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/";

/// Errors raised while resolving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file extension is neither yaml nor json.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,
    /// The YAML document did not match the configuration schema.
    #[error("invalid yaml configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The JSON document did not match the configuration schema.
    #[error("invalid json configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// An environment variable held an unusable value.
    #[error("Invalid {name} value: {reason}")]
    Env { name: &'static str, reason: String },
    /// The resolved configuration failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Relative endpoint paths, joined onto [`ClientConfig::api_base_url`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiPaths {
    pub login: String,
    pub forgot_password: String,
    pub reset_password: String,
    pub user_profile: String,
    pub users: String,
    pub recipes: String,
    pub ingredients: String,
    pub news: String,
    pub notifications: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            login: "Auth/login".to_string(),
            forgot_password: "identity/forgotPassword".to_string(),
            reset_password: "identity/resetPassword".to_string(),
            user_profile: "UserProfile".to_string(),
            users: "users".to_string(),
            recipes: "Recipes".to_string(),
            ingredients: "Ingredients".to_string(),
            news: "news".to_string(),
            notifications: "notifications".to_string(),
        }
    }
}

/// The main configuration structure for the admin client
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API; every endpoint path is joined onto it
    pub api_base_url: Url,

    /// Logging level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rows per page in resource tables
    pub page_size: u32,

    /// How long an error banner stays up before it expires
    pub banner_ttl_secs: u64,

    /// Where the session credentials are persisted. Defaults to the
    /// platform config directory.
    pub session_path: Option<PathBuf>,

    /// Endpoint paths
    pub paths: ApiPaths,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never; the default base URL is a valid literal.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base url is valid"),
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            page_size: 10,
            banner_ttl_secs: 5,
            session_path: None,
            paths: ApiPaths::default(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a yaml or json configuration file.
    /// * `base_url_override` - Optional API base URL taking precedence over everything else.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, an
    /// environment variable is malformed, or the result fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        base_url_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = Self::with_defaults();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
        }

        // Environment variables only fill values the file left at their defaults
        if config.api_base_url == defaults.api_base_url {
            if let Ok(value) = env::var("NUTRIADMIN_API_BASE_URL") {
                config.api_base_url = Url::parse(&value).map_err(|err| ConfigError::Env {
                    name: "NUTRIADMIN_API_BASE_URL",
                    reason: err.to_string(),
                })?;
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(value) = env::var("NUTRIADMIN_LOG_LEVEL") {
                config.log_level = value;
            }
        }
        if config.session_path.is_none() {
            if let Ok(value) = env::var("NUTRIADMIN_SESSION_PATH") {
                config.session_path = Some(PathBuf::from(value));
            }
        }
        if config.page_size == defaults.page_size {
            if let Ok(value) = env::var("NUTRIADMIN_PAGE_SIZE") {
                config.page_size = value.parse().map_err(|_| ConfigError::Env {
                    name: "NUTRIADMIN_PAGE_SIZE",
                    reason: "must be a positive number".to_string(),
                })?;
            }
        }
        if config.request_timeout_secs == defaults.request_timeout_secs {
            if let Ok(value) = env::var("NUTRIADMIN_REQUEST_TIMEOUT_SECS") {
                config.request_timeout_secs = value.parse().map_err(|_| ConfigError::Env {
                    name: "NUTRIADMIN_REQUEST_TIMEOUT_SECS",
                    reason: "must be a number of seconds".to_string(),
                })?;
            }
        }

        if let Some(url) = base_url_override {
            config.api_base_url = url;
        }

        config.validate().map_err(|errors| ConfigError::Invalid(errors.join("; ")))?;
        Ok(config)
    }

    /// Validate the resolved configuration.
    ///
    /// # Errors
    /// Returns every problem found, one message per entry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            errors.push(format!(
                "API base URL must use http or https, got {}",
                self.api_base_url.scheme()
            ));
        }
        if self.page_size == 0 {
            errors.push("Page size must be greater than 0.".to_string());
        }
        if self.request_timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The file the session credentials live in.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.session_path.clone().unwrap_or_else(default_session_path)
    }
}

/// `<config dir>/nutriadmin/session.json`, or `./session.json` when the
/// platform has no config directory.
#[must_use]
pub fn default_session_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("nutriadmin").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./session.json"))
}
