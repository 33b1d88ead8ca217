use serde::Deserialize;

/// Engine tunables. Plain data: there is no file or environment loading;
/// hosts construct this directly or deserialize it from their own embed
/// options.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// How long a completed survey suppresses re-display, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: i64,
    /// Delay before the first slide is shown without visitor action.
    #[serde(default = "default_first_advance_delay_ms")]
    pub first_advance_delay_ms: u64,
    /// Path the completed survey is posted to, relative to the host origin.
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
    /// Optional bound on the slide height measurement. `None` waits
    /// indefinitely; when the bound elapses the resize is skipped.
    #[serde(default)]
    pub measure_timeout_ms: Option<u64>,
}

// Default functions
fn default_cooldown_ms() -> i64 {
    // 28 days
    1000 * 60 * 60 * 24 * 28
}
fn default_first_advance_delay_ms() -> u64 {
    500
}
fn default_endpoint_path() -> String {
    "/fez-survey-response".to_string()
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            first_advance_delay_ms: default_first_advance_delay_ms(),
            endpoint_path: default_endpoint_path(),
            measure_timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SurveyConfig::default();
        assert_eq!(config.cooldown_ms, 28 * 24 * 60 * 60 * 1000);
        assert_eq!(config.first_advance_delay_ms, 500);
        assert_eq!(config.endpoint_path, "/fez-survey-response");
        assert_eq!(config.measure_timeout_ms, None);
    }

    #[test]
    fn test_deserialize_with_partial_overrides() {
        let config: SurveyConfig =
            serde_json::from_str(r#"{"cooldown_ms": 1000, "measure_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.cooldown_ms, 1000);
        assert_eq!(config.measure_timeout_ms, Some(250));
        assert_eq!(config.first_advance_delay_ms, 500);
        assert_eq!(config.endpoint_path, "/fez-survey-response");
    }
}
