//! Daemon configuration, read once from the environment at startup

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use taskgate_api_http::HttpServerConfig;
use taskgate_core::domain::QueueName;
use taskgate_core::error::{AppError, Result};

pub const DEFAULT_DB_PATH: &str = "~/.taskgate/queues.db";
pub const DEFAULT_QUEUE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    #[default]
    Pretty,
    /// Production: JSON structured logging
    Json,
}

impl LogFormat {
    /// Unknown values fall back to pretty output
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub http: HttpServerConfig,
    /// Queues declared at boot
    pub queues: Vec<QueueName>,
    /// JSON file of per-queue settings applied at boot
    pub queue_config: Option<PathBuf>,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("TASKGATE_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let mut http = HttpServerConfig::default();
        if let Some(host) = lookup("TASKGATE_HTTP_HOST") {
            http.host = host;
        }
        if let Some(port) = lookup("TASKGATE_HTTP_PORT") {
            http.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "TASKGATE_HTTP_PORT must be a port number, got '{}'",
                    port
                ))
            })?;
        }

        let queues = lookup("TASKGATE_QUEUES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|queues| !queues.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_QUEUE.to_string()]);

        Ok(Self {
            db_path: expand(&db_path),
            http,
            queues,
            queue_config: lookup("TASKGATE_QUEUE_CONFIG").map(|path| PathBuf::from(expand(&path))),
            log_format: lookup("TASKGATE_LOG_FORMAT")
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
            log_dir: lookup("TASKGATE_LOG_DIR").map(|path| PathBuf::from(expand(&path))),
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.contains(":memory:")
    }
}

fn expand(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// Read `{ "<queue>": { ...settings } }` from `path`
pub fn read_queue_settings(path: &Path) -> Result<BTreeMap<QueueName, Map<String, Value>>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Cannot read queue config {}: {}", path.display(), e))
    })?;

    parse_queue_settings(&raw)
        .map_err(|e| AppError::Config(format!("Invalid queue config {}: {}", path.display(), e)))
}

fn parse_queue_settings(
    raw: &str,
) -> serde_json::Result<BTreeMap<QueueName, Map<String, Value>>> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<DaemonConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.db_path.ends_with(".taskgate/queues.db"));
        assert!(!config.db_path.starts_with('~'));
        assert_eq!(config.http, HttpServerConfig::default());
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.queues, vec!["default".to_string()]);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.queue_config.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TASKGATE_DB_PATH", ":memory:"),
            ("TASKGATE_HTTP_HOST", "0.0.0.0"),
            ("TASKGATE_HTTP_PORT", "9000"),
            ("TASKGATE_QUEUES", "emails, reports,,"),
            ("TASKGATE_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert!(config.is_in_memory());
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.queues, vec!["emails", "reports"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("TASKGATE_HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_blank_queue_list_uses_default() {
        let config = config_from(&[("TASKGATE_QUEUES", " , ")]).unwrap();
        assert_eq!(config.queues, vec!["default"]);
    }

    #[test]
    fn test_parse_queue_settings() {
        let settings =
            parse_queue_settings(r#"{"emails": {"interval": 5000, "batch": 10}}"#).unwrap();

        assert_eq!(
            Value::Object(settings["emails"].clone()),
            json!({"interval": 5000, "batch": 10})
        );
    }

    #[test]
    fn test_queue_settings_must_be_objects() {
        assert!(parse_queue_settings(r#"{"emails": 5000}"#).is_err());
    }

    #[test]
    fn test_missing_queue_settings_file() {
        let err = read_queue_settings(Path::new("/nonexistent/taskgate.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
