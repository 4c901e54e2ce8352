use std::env;
use std::sync::OnceLock;

/// Canonical application identity (used by help/version surfaces).
pub const APP_NAME: &str = "taskrs";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Process-level configuration snapshot.
///
/// Loaded once at startup so every command sees the same view of the
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub program_name: String,
    pub log_filter: String,
    pub show_internal_tasks: bool,
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn flag_value(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v == 1)
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            program_name: non_empty(lookup("TASKRS_PROGRAM_NAME"))
                .unwrap_or_else(|| APP_NAME.to_string()),
            log_filter: non_empty(lookup("TASKRS_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            show_internal_tasks: flag_value(lookup("TASKRS_SHOW_INTERNAL"), false),
        }
    }
}

pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.program_name, APP_NAME);
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
        assert!(!cfg.show_internal_tasks);
    }

    #[test]
    fn environment_overrides() {
        let cfg = config_from(&[
            ("TASKRS_PROGRAM_NAME", " mytool "),
            ("TASKRS_LOG", "taskrs=debug"),
            ("TASKRS_SHOW_INTERNAL", "1"),
        ]);
        assert_eq!(cfg.program_name, "mytool");
        assert_eq!(cfg.log_filter, "taskrs=debug");
        assert!(cfg.show_internal_tasks);
    }

    #[test]
    fn blank_and_garbage_values_fall_back() {
        let cfg = config_from(&[
            ("TASKRS_PROGRAM_NAME", "   "),
            ("TASKRS_SHOW_INTERNAL", "yes"),
        ]);
        assert_eq!(cfg.program_name, APP_NAME);
        assert!(!cfg.show_internal_tasks);
    }
}
