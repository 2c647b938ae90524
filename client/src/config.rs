//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_STORAGE_DIR: &str = ".conectahc";

/// Configuration values for the command-line client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONECTAHC")]
pub struct ClientSettings {
    /// Simulated remote latency in milliseconds.
    #[ortho_config(default = 500)]
    pub latency_ms: u64,
    /// Directory holding the client storage file.
    pub storage_dir: Option<PathBuf>,
    /// Emit logs as JSON instead of human-readable lines.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl ClientSettings {
    /// Simulated remote latency.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Return the configured storage directory, falling back to the default.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("conectahc")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("CONECTAHC_LATENCY_MS", None::<String>),
            ("CONECTAHC_STORAGE_DIR", None::<String>),
            ("CONECTAHC_JSON_LOGS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.latency(), Duration::from_millis(500));
        assert_eq!(settings.storage_dir(), PathBuf::from(DEFAULT_STORAGE_DIR));
        assert!(!settings.json_logs);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CONECTAHC_LATENCY_MS", Some("0".to_owned())),
            ("CONECTAHC_STORAGE_DIR", Some("/tmp/conectahc".to_owned())),
            ("CONECTAHC_JSON_LOGS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.latency(), Duration::ZERO);
        assert_eq!(settings.storage_dir(), PathBuf::from("/tmp/conectahc"));
        assert!(settings.json_logs);
    }
}
