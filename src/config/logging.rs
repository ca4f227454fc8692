use serde::Deserialize;

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,  // e.g. "info", "debug", "warn"
    pub format: String, // e.g. "json", "console"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "console".to_string(),
        }
    }
}
