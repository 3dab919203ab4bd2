//! # Configuration
//!
//! Runtime configuration for the client.
//!
//! The target address and port arrive on the command line; everything else is
//! small enough to live here with sensible defaults and environment-variable
//! overrides.
//!
//! ## Environment Variables
//! - `NBT_DUMPER_CONNECT_TIMEOUT_MS` — connection timeout in milliseconds
//! - `NBT_DUMPER_USERNAME` — offline-mode username sent in LoginStart
//! - `NBT_DUMPER_OUTPUT` — path the registry blob is written to

use crate::error::{ProtocolError, Result};
use crate::utils::timeout;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for connection attempts
    pub connect_timeout: Duration,

    /// Username self-asserted during the offline-mode login
    pub username: String,

    /// Destination file for the captured registry blob
    pub output_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: timeout::DEFAULT_CONNECT_TIMEOUT,
            username: String::from("NBTDumper"),
            output_path: PathBuf::from("nbt.bin"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout_ms) = std::env::var("NBT_DUMPER_CONNECT_TIMEOUT_MS") {
            if let Ok(val) = timeout_ms.parse::<u64>() {
                config.connect_timeout = Duration::from_millis(val);
            }
        }

        if let Ok(username) = std::env::var("NBT_DUMPER_USERNAME") {
            config.username = username;
        }

        if let Ok(output) = std::env::var("NBT_DUMPER_OUTPUT") {
            config.output_path = PathBuf::from(output);
        }

        config
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.connect_timeout.as_millis() < 100 {
            errors.push("Connection timeout too short (minimum: 100ms)".to_string());
        } else if self.connect_timeout.as_secs() > 300 {
            errors.push("Connection timeout too long (maximum: 300s)".to_string());
        }

        if self.username.is_empty() {
            errors.push("Username cannot be empty".to_string());
        } else if self.username.len() > 16 {
            // Vanilla servers reject names longer than 16 characters.
            errors.push(format!(
                "Username too long: {} characters (maximum: 16)",
                self.username.len()
            ));
        }

        if self.output_path.as_os_str().is_empty() {
            errors.push("Output path cannot be empty".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
