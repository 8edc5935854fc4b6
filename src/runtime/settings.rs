use crate::cli::Args;
use crate::config;

/// Load settings for this run. Config is optional: an unreadable or
/// invalid file falls back to defaults. Command-line flags win over both.
///
/// Runs before logging is set up, so problems go to stderr (the terminal
/// is not in raw mode yet) and are returned for the log as well.
pub fn load_settings(args: &Args) -> (config::Settings, Option<String>) {
    let path = args.config.clone().or_else(config::resolve_config_path);

    let (mut settings, warning) = match config::Settings::load_from(path.as_deref()) {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    };
    if let Some(w) = &warning {
        eprintln!("lectern: {w}");
    }

    if let Some(url) = args.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        settings.api.base_url = url.to_string();
    }
    if let Some(file) = &args.log_file {
        settings.logging.file = Some(file.clone());
    }

    (settings, warning)
}
