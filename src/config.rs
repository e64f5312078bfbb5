use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HospitalManagement";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file name inside the application data directory.
pub const DB_FILE_NAME: &str = "hospital.db";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Get the application data directory.
/// ~/HospitalManagement/ on all platforms; falls back to the working
/// directory when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default on-disk database location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILE_NAME)
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "hospital_lib=info,hospital_backend=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime settings for the HTTP server, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Insert reference departments and doctors when the tables are empty.
    pub seed_reference_data: bool,
    /// Origin of the browser frontend allowed through CORS, if any.
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("HOSPITAL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "HOSPITAL_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let db_path = lookup("HOSPITAL_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let seed_reference_data = match lookup("HOSPITAL_SEED") {
            None => true,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                var: "HOSPITAL_SEED",
                value: raw,
            })?,
        };

        let cors_origin = lookup("HOSPITAL_CORS_ORIGIN").filter(|o| !o.trim().is_empty());

        Ok(Self {
            bind_addr,
            db_path,
            seed_reference_data,
            cors_origin,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
