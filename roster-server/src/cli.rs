//! Command-line arguments

use clap::Parser;
use roster_common::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "roster-server")]
#[command(about = "Employee roster service with bulk import")]
#[command(version)]
pub struct Args {
    /// Root folder holding the database and default feed file
    #[arg(short, long, env = "ROSTER_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "ROSTER_DATABASE")]
    pub database: Option<PathBuf>,

    /// Local JSON feed document
    #[arg(long, env = "ROSTER_FEED_PATH")]
    pub feed_path: Option<PathBuf>,

    /// Remote JSON feed document (takes precedence over --feed-path)
    #[arg(long, env = "ROSTER_FEED_URL")]
    pub feed_url: Option<String>,

    /// Listen address, e.g. 127.0.0.1:5780
    #[arg(short, long, env = "ROSTER_BIND")]
    pub bind: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "ROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default tracing filter when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_folder: self.root_folder.clone(),
            database: self.database.clone(),
            feed_path: self.feed_path.clone(),
            feed_url: self.feed_url.clone(),
            bind: self.bind.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
