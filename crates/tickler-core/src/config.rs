use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default capacity of the fire-report channel (scheduler → caller).
pub const DEFAULT_REPORT_BUFFER: usize = 256;

/// Top-level config (tickler.toml + TICKLER_* env overrides).
///
/// Built once at startup and handed to constructors by value; nothing reads
/// configuration from a global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicklerConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

/// Reminder scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Remove a reminder from the store as soon as its notification has been
    /// dispatched (default: true).
    /// Override with env var: TICKLER_SCHEDULER__AUTO_DELETE_ON_TRIGGER=false
    #[serde(default = "bool_true")]
    pub auto_delete_on_trigger: bool,
    /// Capacity of the fire-report channel; reports are dropped when it is full.
    #[serde(default = "default_report_buffer")]
    pub report_buffer: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            auto_delete_on_trigger: true,
            report_buffer: DEFAULT_REPORT_BUFFER,
        }
    }
}

/// Settings for the bot front-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Verbose logging when `RUST_LOG` is not set.
    #[serde(default)]
    pub debug: bool,
}

fn bool_true() -> bool {
    true
}
fn default_report_buffer() -> usize {
    DEFAULT_REPORT_BUFFER
}

impl TicklerConfig {
    /// Load config from a TOML file with TICKLER_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.tickler/tickler.toml
    ///
    /// A missing file is not an error: every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(%path, "loading config");

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("TICKLER_").split("__")),
        )
    }

    /// Extract the config from an already assembled figment.
    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        figment
            .extract()
            .map_err(|e| crate::error::TicklerError::Config(e.to_string()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.tickler/tickler.toml", home)
}
