use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from roster.toml (optional, next to the data file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key hint line in the status row when idle
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme color overrides, keyed by theme slot (`background`, `highlight`, ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-server colors, keyed by server name (`Blue`, `Green`, `Red`)
    #[serde(default)]
    pub server_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            server_colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
