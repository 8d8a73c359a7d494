//! timesheet - weekly class schedule viewer
//!
//! Wires together:
//! - Configuration loading and command-line overrides
//! - Provider selection (mock or remote)
//! - The timesheet store
//! - Clock and current-class tickers in watch mode

mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use timesheet_config::{
    MockData, ProviderKind, ProviderSettings, Settings, check_base_url, load_config,
    load_config_or_default,
};
use timesheet_core::{TimesheetStore, spawn_clock, spawn_current_class_refresh};
use timesheet_provider::{MockProvider, RemoteProvider, TimesheetProvider};
use timesheet_util::{Clock, ConfigLocation, SystemClock, config_location, is_mock_time_active};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// timesheet - Show a student's weekly classes and highlight the current one
#[derive(Parser, Debug)]
#[command(name = "timesheet")]
#[command(about = "Show a student's weekly classes and highlight the current one", long_about = None)]
struct Args {
    /// Student ID to load
    student_id: String,

    /// Configuration file path, or $TIMESHEET_CONFIG; must exist when given
    /// (default: ~/.config/timesheet/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Provider override: mock or remote
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Base URL override for the remote provider
    #[arg(long, env = "TIMESHEET_BASE_URL")]
    base_url: Option<String>,

    /// Keep running and re-render as time passes
    #[arg(short, long)]
    watch: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(&config_location(self.config.clone()))?;

        if let Some(kind) = self.provider {
            settings.provider.kind = kind;
        }
        if let Some(url) = &self.base_url {
            check_base_url(url)
                .map_err(|message| anyhow::anyhow!("Invalid base URL '{}': {}", url, message))?;
            settings.provider.base_url = Some(url.clone());
        }

        Ok(settings)
    }
}

/// Explicit config paths must exist; a missing default file means defaults
fn load_settings(location: &ConfigLocation) -> Result<Settings> {
    let path = location.path();
    let settings = if location.is_explicit() {
        load_config(path)
    } else {
        load_config_or_default(path)
    };
    settings.with_context(|| format!("Failed to load config from {:?}", path))
}

/// Build the provider selected by configuration
fn build_provider(
    settings: &ProviderSettings,
    mock: Option<&MockData>,
) -> Result<Arc<dyn TimesheetProvider>> {
    match settings.kind {
        ProviderKind::Mock => {
            let provider = match mock {
                Some(data) => MockProvider::with_dataset(data.students.clone(), data.classes.clone()),
                None => MockProvider::new(),
            };
            Ok(Arc::new(provider.with_latency(settings.mock_latency)))
        }
        ProviderKind::Remote => {
            let Some(base_url) = settings.base_url.as_deref() else {
                bail!("Remote provider requires a base URL (--base-url or provider.base_url)");
            };
            let provider = RemoteProvider::new(base_url, settings.timeout)
                .context("Failed to create HTTP client")?;
            info!(endpoint = %provider.endpoint(), "Using remote provider");
            Ok(Arc::new(provider))
        }
    }
}

fn draw(store: &TimesheetStore, clear_screen: bool) {
    if clear_screen {
        print!("\x1b[2J\x1b[H");
    }
    print!("{}", render::render(&store.snapshot(), &store.now()));
}

/// Re-render on every minute or store change until Ctrl-C
async fn watch(store: Arc<TimesheetStore>, clock: Arc<dyn Clock>, settings: &Settings) -> Result<()> {
    let refresh = spawn_current_class_refresh(store.clone(), settings.refresh.current_class);
    let (clock_ticker, mut minutes) = spawn_clock(clock, settings.refresh.clock);
    let mut state = store.subscribe();
    let clear_screen = std::io::stdout().is_terminal();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Watching timesheet, press Ctrl-C to exit");

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Received Ctrl-C, shutting down");
                break;
            }
            changed = minutes.changed() => {
                if changed.is_err() {
                    break;
                }
                debug!(clock = %minutes.borrow().as_str(), "Minute changed");
                draw(&store, clear_screen);
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&store, clear_screen);
            }
        }
    }

    refresh.stop().await;
    clock_ticker.stop().await;
    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = args.settings()?;
    let provider = build_provider(&settings.provider, settings.mock.as_ref())?;

    if is_mock_time_active() {
        info!("Mock time is active");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(TimesheetStore::new(provider, clock.clone()));
    info!(provider = store.provider_name(), student_id = %args.student_id, "Loading timesheet");

    if let Err(e) = store.load(&args.student_id).await {
        eprintln!("{}", e.user_message().unwrap_or("Failed to load timesheet"));
        return Ok(ExitCode::FAILURE);
    }

    draw(&store, false);

    if args.watch {
        watch(store, clock, &settings).await?;
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "timesheet starting");

    run(args).await
}
