use super::load::{default_config_path, resolve_config_path, state_dir};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_lectern_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LECTERN_CONFIG_PATH", "/tmp/lectern-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/lectern-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("lectern")
            .join("config.toml")
    );
}

#[test]
fn state_dir_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/lectern")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.player.unmute_fallback_volume, 0.5);
    assert_eq!(s.ui.notice_seconds, 5);
    assert_eq!(s.admin.max_upload_bytes, 2 * 1024 * 1024 * 1024);
    assert!(s.admin.extensions.iter().any(|e| e == "m4a"));
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.player.unmute_fallback_volume = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.api.base_url = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.admin.extensions.clear();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.notice_seconds = u64::MAX;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("LECTERN__API__BASE_URL");

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[api]
base_url = "https://tracks.example.org/api"
timeout_secs = 10

[player]
initial_volume = 0.8
seek_step_seconds = 15

[ui]
notice_seconds = 2
show_file_size = false

[admin]
upload_dir = "/srv/audio"
extensions = ["mp3"]
confirm_delete = false

[session]
persist = false
"#,
    )
    .unwrap();

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.api.base_url, "https://tracks.example.org/api");
    assert_eq!(s.api.timeout_secs, 10);
    assert_eq!(s.api.upload_timeout_secs, 600);
    assert_eq!(s.player.initial_volume, 0.8);
    assert_eq!(s.player.seek_step_seconds, 15);
    assert_eq!(s.ui.notice_seconds, 2);
    assert!(!s.ui.show_file_size);
    assert_eq!(
        s.admin.upload_dir.as_deref(),
        Some(std::path::Path::new("/srv/audio"))
    );
    assert_eq!(s.admin.extensions, vec!["mp3".to_string()]);
    assert!(!s.admin.confirm_delete);
    assert!(!s.session.persist);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[api]
base_url = "https://from-file.example.org/api"
"#,
    )
    .unwrap();

    let _g = EnvGuard::set("LECTERN__API__BASE_URL", "https://from-env.example.org/api");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.api.base_url, "https://from-env.example.org/api");
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("LECTERN__API__BASE_URL");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(&dir.path().join("nope.toml"))).unwrap();
    assert_eq!(s.api.base_url, ApiSettings::default().base_url);
}
