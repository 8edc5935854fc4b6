//! Command-line interface definitions.
//!
//! Every flag here overrides the matching config value for one run.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "lectern", version, about = "Terminal client for a remote audio track library")]
pub struct Args {
    /// API base URL, e.g. https://audio.example.org/api
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Config file (TOML). Defaults to $XDG_CONFIG_HOME/lectern/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
