use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use backdesk::infrastructure::{
    AppConfig, CliArgs, KeyringSessionStorage, PlatformAuthClient, PlatformClient,
    PlatformRestClient, StorageManager,
};
use backdesk::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn create_app() -> Result<(App, bool)> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;

    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    init_logging(&config)?;

    info!(version = backdesk::VERSION, "Starting {}", backdesk::NAME);

    if !config.platform.is_configured() {
        bail!(
            "platform URL and anon key are required (set BACKDESK_PLATFORM_URL and BACKDESK_ANON_KEY or the [platform] config section)"
        );
    }

    let client = PlatformClient::new(
        config.platform.url.clone(),
        config.platform.anon_key.clone(),
        config.platform.timeout(),
    )?;

    let auth = Arc::new(PlatformAuthClient::new(client.clone()));
    let rest = Arc::new(PlatformRestClient::new(client));
    let session_storage = Arc::new(KeyringSessionStorage::new());

    let app = App::new(&config, storage, auth, rest, session_storage);

    Ok((app, config.mouse))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let (app, mouse) = create_app()?;

    let mut terminal = ratatui::init();
    if mouse {
        execute!(std::io::stdout(), EnableMouseCapture)?;
    }

    let result = app.run(&mut terminal).await;

    if mouse {
        execute!(std::io::stdout(), DisableMouseCapture)?;
    }
    ratatui::restore();

    result
}
