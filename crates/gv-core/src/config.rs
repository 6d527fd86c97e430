//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON. Every section
//! defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Read and parse a config file, surfacing every failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None`, the file does not exist, or it fails to parse.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if let Some(ref dir) = self.server.template_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "server.template_dir {} is not a directory; built-in templates will be used",
                    dir.display()
                ));
            }
        }

        if self.auth.session_timeout_hours == 0 {
            warnings.push("auth.session_timeout_hours is 0; sessions expire immediately".into());
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            warnings.push(format!(
                "auth.bcrypt_cost {} is outside 4..=31; registration will fail",
                self.auth.bcrypt_cost
            ));
        }

        if self.auth.sweep_interval_secs == 0 {
            warnings.push("auth.sweep_interval_secs is 0; expired sessions are never swept".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Directory served under `/static` when it exists.
    pub static_dir: Option<PathBuf>,
    /// Directory of `*.hbs` files overriding the built-in page templates.
    pub template_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("./data/gradeview.db"),
            static_dir: None,
            template_dir: None,
        }
    }
}

/// Login session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_timeout_hours: u64,
    pub bcrypt_cost: u32,
    /// Mark session cookies `Secure` (only sent over HTTPS).
    pub secure_cookies: bool,
    pub sweep_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_timeout_hours: 24,
            bcrypt_cost: 12,
            secure_cookies: false,
            sweep_interval_secs: 3600,
        }
    }
}
