#![forbid(unsafe_code)]

mod constants;
mod discord;
mod error;
mod profile;
mod service;
mod session;
mod store;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use discord::DiscordService;
use profile::Profile;
use service::PresenceUpdate;
use session::{ElapsedUnit, PresenceSession, compute_start_timestamp};
use store::ProfileStore;

/// Rich Presence profile launcher
#[derive(Parser)]
#[command(name = "zrpc", version, about = "Rich Presence profile launcher")]
struct Cli {
    /// Directory holding profile files (defaults to the platform config dir)
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saved profile names
    List,

    /// Print a saved profile
    Show {
        name: String,

        /// Print as JSON instead of the on-disk form
        #[arg(long)]
        json: bool,
    },

    /// Create or overwrite a profile
    Save {
        name: String,

        /// Application id the broadcast is attributed to
        #[arg(long)]
        client_id: String,

        /// First description line
        #[arg(long, default_value = "")]
        details: String,

        /// Second description line
        #[arg(long, default_value = "")]
        state: String,

        /// Key of the large image asset
        #[arg(long)]
        large_image: String,

        #[arg(long, default_value = "")]
        large_image_tooltip: String,

        #[arg(long, default_value = "")]
        small_image: String,

        #[arg(long, default_value = "")]
        small_image_tooltip: String,

        /// How long ago the activity started (recorded as StartTimestamp)
        #[arg(long)]
        elapsed: Option<String>,

        #[arg(long, value_enum, default_value_t = ElapsedUnit::Hours)]
        unit: ElapsedUnit,
    },

    /// Activate a profile and broadcast until interrupted
    Run {
        name: String,

        /// How long ago the activity started
        #[arg(long)]
        elapsed: Option<String>,

        #[arg(long, value_enum, default_value_t = ElapsedUnit::Hours)]
        unit: ElapsedUnit,
    },
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let dir = cli
        .profile_dir
        .clone()
        .unwrap_or_else(ProfileStore::default_dir);
    let store = ProfileStore::new(dir);

    match cli.command {
        Command::List => {
            let names = store.list_names()?;
            if names.is_empty() {
                info!(dir = %store.dir().display(), "no saved profiles");
            }
            for name in names {
                println!("{name}");
            }
        }

        Command::Show { name, json } => {
            let profile = store.load(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print!("{}", profile.render());
            }
        }

        Command::Save {
            name,
            client_id,
            details,
            state,
            large_image,
            large_image_tooltip,
            small_image,
            small_image_tooltip,
            elapsed,
            unit,
        } => {
            let profile = Profile {
                client_id: client_id.trim().to_string(),
                details: details.trim().to_string(),
                state: state.trim().to_string(),
                large_image: large_image.trim().to_string(),
                large_image_tooltip: large_image_tooltip.trim().to_string(),
                small_image: small_image.trim().to_string(),
                small_image_tooltip: small_image_tooltip.trim().to_string(),
                start_timestamp: start_timestamp_from(elapsed.as_deref(), unit)?,
            };
            store.save(&name, &profile)?;
            println!("Profile '{name}' saved.");
        }

        Command::Run {
            name,
            elapsed,
            unit,
        } => run_profile(&store, &name, elapsed.as_deref(), unit)?,
    }

    Ok(())
}

/// Activate `name` against Discord and broadcast until SIGINT/SIGTERM,
/// then tear the session down.
fn run_profile(
    store: &ProfileStore,
    name: &str,
    elapsed: Option<&str>,
    unit: ElapsedUnit,
) -> Result<()> {
    let profile = store.load(name)?;
    // saved files can be hand-edited, so re-check the required fields
    profile.validate()?;

    let start = start_timestamp_from(elapsed, unit)?;
    let update = PresenceUpdate::from_profile(&profile, start);

    let mut session = PresenceSession::new(DiscordService);
    session.activate(&profile.client_id, &update)?;
    info!(profile = %name, client_id = %profile.client_id, "presence launched");

    wait_for_shutdown()?;

    session.deactivate()?;
    info!(profile = %name, "presence cleared");
    Ok(())
}

/// Resolve the optional elapsed input to an absolute start timestamp.
///
/// Malformed input is logged and dropped rather than failing the command;
/// the broadcast simply goes out without a start time.
fn start_timestamp_from(elapsed: Option<&str>, unit: ElapsedUnit) -> Result<Option<i64>> {
    let Some(raw) = elapsed else {
        return Ok(None);
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the epoch")?
        .as_secs() as i64;

    let start = compute_start_timestamp(raw, unit, now);
    if start.is_none() {
        warn!(input = %raw, unit = %unit, "ignoring unparseable elapsed time");
    }
    Ok(start)
}

/// Block until SIGINT or SIGTERM.
fn wait_for_shutdown() -> Result<()> {
    let term = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))
            .context("failed to register SIGINT handler")?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))
            .context("failed to register SIGTERM handler")?;
    }

    info!("presence active, press Ctrl-C to stop");
    while !term.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(constants::shutdown::POLL_INTERVAL_MS));
    }
    Ok(())
}
