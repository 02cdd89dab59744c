// Queue Configuration Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the polling interval (milliseconds) every configuration carries
pub const INTERVAL_KEY: &str = "interval";

/// Polling interval handed out when a queue has no explicit configuration (30s)
pub const DEFAULT_INTERVAL_MS: u64 = 30 * 1000;

/// Settings sent to workers polling a queue.
///
/// Always contains `interval`; every other key is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueConfig(Map<String, Value>);

impl Default for QueueConfig {
    fn default() -> Self {
        let mut settings = Map::new();
        settings.insert(INTERVAL_KEY.to_string(), Value::from(DEFAULT_INTERVAL_MS));
        Self(settings)
    }
}

impl QueueConfig {
    /// Fill in every default key missing from `settings`; keys already present win.
    pub fn merged_with_defaults(mut settings: Map<String, Value>) -> Self {
        for (key, value) in QueueConfig::default().0 {
            settings.entry(key).or_insert(value);
        }
        Self(settings)
    }

    /// Polling interval in milliseconds, if it is a non-negative integer
    pub fn interval_ms(&self) -> Option<u64> {
        self.0.get(INTERVAL_KEY).and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_is_thirty_seconds() {
        let config = QueueConfig::default();
        assert_eq!(config.interval_ms(), Some(30000));
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({"interval": 30000}));
    }

    #[test]
    fn test_explicit_keys_override_defaults() {
        let config =
            QueueConfig::merged_with_defaults(settings(json!({"interval": 10000, "custom": "x"})));

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"interval": 10000, "custom": "x"})
        );
    }

    #[test]
    fn test_missing_interval_falls_back() {
        let config = QueueConfig::merged_with_defaults(settings(json!({"batch": 5})));

        assert_eq!(config.interval_ms(), Some(DEFAULT_INTERVAL_MS));
        assert_eq!(config.get("batch"), Some(&json!(5)));
    }

    #[test]
    fn test_non_numeric_interval_is_passed_through() {
        let config = QueueConfig::merged_with_defaults(settings(json!({"interval": "fast"})));

        assert_eq!(config.get(INTERVAL_KEY), Some(&json!("fast")));
        assert_eq!(config.interval_ms(), None);
    }
}
