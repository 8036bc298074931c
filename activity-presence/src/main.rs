//! Activity Presence - Main entry point
//!
//! Polls the foreground window, prints every presence change as a JSON line
//! on stdout and logs icon updates as they resolve.
//!
//! # Usage
//!
//! ```bash
//! activity-presence
//! activity-presence --config /path/to/config.toml
//! activity-presence --clear-cache
//! ```

use activity_presence::publisher::{ChannelSink, IconDisplay, IconUpdate};
use activity_presence::router::build_icon_resolver;
use activity_presence::{Config, PresenceRouter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line options
#[derive(Debug, Clone, Default)]
struct CliArgs {
    /// Path to config file
    config_path: Option<PathBuf>,
    /// Clear the icon cache and exit
    clear_cache: bool,
}

/// Parse command line arguments
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-v" => {
                println!("activity-presence {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    cli.config_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }
            }
            "--clear-cache" => {
                cli.clear_cache = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_help() {
    println!(
        r#"Activity Presence - Foreground activity status

USAGE:
    activity-presence [OPTIONS]

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version
    -c, --config <PATH>     Path to configuration file
    --clear-cache           Delete all cached icons and exit

OUTPUT:
    One JSON presence record per line on stdout, written whenever the
    foreground application or window title changes.

ENVIRONMENT:
    RUST_LOG                Log filter, overrides general.log_level
"#
    );
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args();

    let config_path = cli
        .config_path
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let config = Config::load_from_path(config_path.clone());

    init_logging(&config.general.log_level);
    info!("Starting Activity Presence (config: {:?})", config_path);

    if cli.clear_cache {
        match build_icon_resolver(&config.icons)? {
            Some(resolver) => {
                resolver.clear_cache().await?;
                println!("Cleared icon cache at {}", resolver.cache().dir().display());
            }
            None => println!("Icons are disabled, nothing to clear"),
        }
        return Ok(());
    }

    if !config.general.enabled {
        info!("Presence is disabled in configuration, exiting");
        return Ok(());
    }

    // Setup shutdown signal
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let (sink, mut record_rx) = ChannelSink::channel(64);
    let (icon_tx, mut icon_rx) = mpsc::channel::<IconUpdate>(64);
    let mut router = PresenceRouter::from_config(&config, Arc::new(sink), icon_tx)?;

    // Presence records → stdout
    tokio::spawn(async move {
        while let Some(record) = record_rx.recv().await {
            match serde_json::to_string(&record) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to serialize presence: {}", e),
            }
        }
    });

    // Icon updates, newest generation wins
    tokio::spawn(async move {
        let mut display = IconDisplay::new();
        while let Some(update) = icon_rx.recv().await {
            let summary = format!(
                "{} ({}x{} from {}, generation {})",
                update.identifier,
                update.icon.width,
                update.icon.height,
                update.icon.source.as_str(),
                update.generation
            );
            if display.apply(update) {
                info!("Icon ready: {}", summary);
            }
        }
    });

    let interval = config.timing.poll_interval();
    let mut tick_interval = tokio::time::interval(interval);
    info!("Polling foreground window every {:?}", interval);

    while running.load(Ordering::SeqCst) {
        tick_interval.tick().await;
        router.tick().await;
    }

    let status = router.status();
    info!(
        "Stopped after {} activity changes ({} published, {} failed)",
        status.changes, status.published, status.publish_failures
    );

    Ok(())
}
