use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/lectern/config.toml` or `~/.config/lectern/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LECTERN__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub admin: AdminSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to, e.g. `https://example.org/api`.
    pub base_url: String,
    /// Timeout for ordinary JSON requests (seconds).
    pub timeout_secs: u64,
    /// Timeout for multipart uploads (seconds). Uploads can be large.
    pub upload_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            upload_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume the player starts with (0.0 - 1.0).
    pub initial_volume: f32,
    /// Volume restored by unmute when no audible level was ever recorded.
    pub unmute_fallback_volume: f32,
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub seek_step_seconds: u64,
    /// Volume change for `-` / `+`.
    pub volume_step: f32,
    /// How often the audio thread reports elapsed time (milliseconds).
    pub tick_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            unmute_fallback_volume: 0.5,
            seek_step_seconds: 5,
            volume_step: 0.05,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long the "uploaded" notice stays visible (seconds).
    pub notice_seconds: u64,
    /// Whether the catalog shows file sizes next to durations.
    pub show_file_size: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " Catechism Audio Library ".to_string(),
            notice_seconds: 5,
            show_file_size: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Directory listed when picking a file to upload. Defaults to the
    /// working directory.
    pub upload_dir: Option<PathBuf>,
    /// File extensions accepted for upload (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Largest file the form will submit (bytes).
    pub max_upload_bytes: u64,
    /// Ask before deleting a track.
    pub confirm_delete: bool,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            upload_dir: None,
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
                "flac".into(),
            ],
            max_upload_bytes: 2 * 1024 * 1024 * 1024,
            confirm_delete: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Keep the token between runs.
    pub persist: bool,
    /// Override for the session file location.
    pub path: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persist: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. The terminal belongs to the UI so logs never go to stdout.
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}
