//! Package Tracker main entry point
//!
//! This is the SwiftBar plugin executable. Run without arguments it prints
//! the menu; menu actions call it back with a subcommand.

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use package_tracker::config::{resolve_config, Config};
use package_tracker::dialog::{confirm_clear, prompt_tracking_number};
use package_tracker::output::{
    format_add_outcome, format_error_menu, format_menu, format_package_list,
    format_refresh_report, MenuContext,
};
use package_tracker::tracker::RefreshMode;
use package_tracker::{JsonStorage, Tracker, TrackerError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Package Tracker: parcel status in the menu bar
///
/// Tracks UPS, USPS, FedEx and DHL shipments by reading the carriers'
/// public tracking pages, and renders them as a SwiftBar menu.
#[derive(Parser, Debug)]
#[command(name = "package-tracker")]
#[command(version = "1.0.0")]
#[command(about = "Parcel status for the menu bar", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the menu, refreshing stale packages first (default)
    Render,

    /// Start tracking a package
    Add {
        /// Tracking number; prompts with a dialog when omitted
        number: Option<String>,

        /// Name to show instead of the tracking number
        #[arg(long)]
        name: Option<String>,
    },

    /// Stop tracking a package
    Remove {
        /// Tracking number to remove
        number: String,
    },

    /// Stop tracking every package
    Clear {
        /// Skip the confirmation dialog
        #[arg(long)]
        yes: bool,
    },

    /// Fetch every package now, ignoring the cache
    Refresh,

    /// List tracked packages with their cached status
    List,

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let command = cli.command.unwrap_or(Command::Render);
    let rendering = matches!(command, Command::Render);

    // The host shows stdout, so failures are reported there and the exit
    // code stays zero
    if let Err(e) = run(command, cli.config).await {
        tracing::error!("{}", e);
        if rendering {
            print!("{}", format_error_menu(&e.to_string()));
        } else {
            println!("❌ {}", e);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for menu markup.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("package_tracker=warn,warn"),
            1 => EnvFilter::new("package_tracker=info,warn"),
            2 => EnvFilter::new("package_tracker=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(command: Command, config_path: Option<PathBuf>) -> Result<(), TrackerError> {
    let (config, source) = resolve_config(config_path.as_deref())?;
    match &source {
        Some(path) => tracing::debug!("Configuration loaded from {}", path.display()),
        None => tracing::debug!("Using built-in configuration"),
    }

    if let Command::CheckConfig = command {
        handle_check_config(&config, source.as_deref());
        return Ok(());
    }

    let storage = JsonStorage::from_config(&config);
    let mut tracker = Tracker::new(config, storage)?;

    match command {
        Command::Render => handle_render(&mut tracker).await,
        Command::Add { number, name } => handle_add(&mut tracker, number, name).await,
        Command::Remove { number } => handle_remove(&mut tracker, &number),
        Command::Clear { yes } => handle_clear(&mut tracker, yes).await,
        Command::Refresh => handle_refresh(&mut tracker).await,
        Command::List => handle_list(&tracker),
        Command::CheckConfig => Ok(()),
    }
}

/// Handles the default mode: refreshes stale packages and prints the menu
async fn handle_render(tracker: &mut Tracker<JsonStorage>) -> Result<(), TrackerError> {
    let views = tracker.refresh_all(RefreshMode::IfStale).await?;

    let ctx = MenuContext {
        executable: executable_path(),
        endpoints: &tracker.config().endpoints,
        updated_at: Local::now().time(),
    };
    print!("{}", format_menu(&views, &ctx));

    Ok(())
}

/// Handles `add`: prompts for a number when none was given
async fn handle_add(
    tracker: &mut Tracker<JsonStorage>,
    number: Option<String>,
    name: Option<String>,
) -> Result<(), TrackerError> {
    let number = match number {
        Some(number) => number,
        None => match prompt_tracking_number().await? {
            Some(number) => number,
            None => {
                tracing::info!("Add cancelled");
                return Ok(());
            }
        },
    };

    let outcome = tracker.add(&number, name).await?;
    print!("{}", format_add_outcome(&outcome));

    Ok(())
}

fn handle_remove(tracker: &mut Tracker<JsonStorage>, number: &str) -> Result<(), TrackerError> {
    if tracker.remove(number)? {
        println!("✅ Removed tracking number: {}", number.trim());
    } else {
        println!("ℹ️ Not tracked: {}", number.trim());
    }
    Ok(())
}

/// Handles `clear`: asks for confirmation unless `--yes` was given
async fn handle_clear(tracker: &mut Tracker<JsonStorage>, yes: bool) -> Result<(), TrackerError> {
    if !yes && !confirm_clear().await? {
        tracing::info!("Clear cancelled");
        return Ok(());
    }

    let count = tracker.clear()?;
    println!("✅ Cleared {} tracking numbers", count);
    Ok(())
}

/// Handles `refresh`: fetches everything regardless of cache age
async fn handle_refresh(tracker: &mut Tracker<JsonStorage>) -> Result<(), TrackerError> {
    println!("🔄 Refreshing all package data...");
    let views = tracker.refresh_all(RefreshMode::Force).await?;
    print!("{}", format_refresh_report(&views));
    Ok(())
}

fn handle_list(tracker: &Tracker<JsonStorage>) -> Result<(), TrackerError> {
    let views = tracker.snapshot()?;
    print!("{}", format_package_list(&views, Utc::now()));
    Ok(())
}

/// Handles `check-config`: shows the effective configuration
fn handle_check_config(config: &Config, source: Option<&std::path::Path>) {
    println!("=== Package Tracker Configuration ===\n");

    match source {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: none (built-in defaults)"),
    }

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_seconds);
    println!("  Connect timeout: {}s", config.http.connect_timeout_seconds);
    println!("  User agent: {}", config.http.user_agent);

    println!("\nFiles:");
    println!("  Cache: {}", config.cache_path().display());
    println!("  Cache ttl: {}s", config.cache.ttl_seconds);
    println!("  Tracking list: {}", config.tracking_path().display());

    println!("\nEndpoints:");
    match &config.endpoints.ups_api {
        Some(api) => println!("  UPS API: {}", api),
        None => println!("  UPS API: disabled"),
    }
    for carrier in package_tracker::Carrier::KNOWN {
        for template in config.endpoints.pages(carrier) {
            println!("  {}: {}", carrier, template);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Path used by menu actions to call this executable again
fn executable_path() -> String {
    std::env::current_exe()
        .ok()
        .or_else(|| std::env::args_os().next().map(PathBuf::from))
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "package-tracker".to_string())
}
