use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

const MAX_NOTICE_SECONDS: u64 = 24 * 60 * 60;

/// Configuration loading helpers.
///
/// `Settings::load_from` reads an optional config file and then environment
/// variables (prefix `LECTERN__`), falling back to struct defaults.
impl Settings {
    /// Load settings using `path` as the (optional) config file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("LECTERN")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("api.base_url must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.player.initial_volume) {
            return Err("player.initial_volume must be within 0.0..=1.0".to_string());
        }
        let fallback = self.player.unmute_fallback_volume;
        if fallback <= 0.0 || fallback > 1.0 {
            return Err("player.unmute_fallback_volume must be within (0.0, 1.0]".to_string());
        }
        if self.player.tick_ms == 0 {
            return Err("player.tick_ms must be >= 1".to_string());
        }
        if self.ui.notice_seconds > MAX_NOTICE_SECONDS {
            return Err(format!("ui.notice_seconds must be <= {MAX_NOTICE_SECONDS}"));
        }
        if self.admin.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("admin.extensions must list at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `LECTERN_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("LECTERN_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/lectern/config.toml`
/// or `~/.config/lectern/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("lectern").join("config.toml"))
}

/// Directory for session and log files: `$XDG_STATE_HOME/lectern` or
/// `~/.local/state/lectern`.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("lectern"))
}
