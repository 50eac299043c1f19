use super::app_config::{LogLevel, ThemeMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "backdesk",
    version,
    about = "A terminal back-office for companies, clients, people, services, users and categories",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Platform project URL.
    #[arg(long, env = "BACKDESK_PLATFORM_URL", value_name = "URL")]
    pub platform_url: Option<String>,

    /// Platform anon key.
    #[arg(long, env = "BACKDESK_ANON_KEY", value_name = "KEY", hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Theme mode.
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Accent color (name or hex code).
    #[arg(long)]
    pub accent_color: Option<String>,

    /// Enable mouse support.
    #[arg(long)]
    pub mouse: Option<bool>,
}
