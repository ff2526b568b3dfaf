//! Widget configuration

use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings the embedding page hands to the widget
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Base URL of the broker (`chatfaqAPI`)
    pub api_url: String,
    pub user_id: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub display_generation: bool,
    pub display_sources: bool,
    pub sources_first: bool,
    pub request_timeout: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: None,
            title: String::new(),
            subtitle: String::new(),
            display_generation: true,
            display_sources: true,
            sources_first: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl WidgetConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values keep defaults
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(default);

        Self {
            api_url: lookup("CHATFAQ_API")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            user_id: lookup("CHATFAQ_USER_ID").filter(|id| !id.is_empty()),
            title: lookup("CHATFAQ_TITLE").unwrap_or(defaults.title),
            subtitle: lookup("CHATFAQ_SUBTITLE").unwrap_or(defaults.subtitle),
            display_generation: flag("CHATFAQ_DISPLAY_GENERATION", defaults.display_generation),
            display_sources: flag("CHATFAQ_DISPLAY_SOURCES", defaults.display_sources),
            sources_first: flag("CHATFAQ_SOURCES_FIRST", defaults.sources_first),
            request_timeout: lookup("CHATFAQ_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.request_timeout, Duration::from_secs),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
