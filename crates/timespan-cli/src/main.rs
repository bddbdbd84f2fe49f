//! `timespan` CLI: resolve time expressions into query time ranges.
//!
//! ## Usage
//!
//! ```sh
//! # Last two and a half hours
//! timespan resolve -t 2h30m
//!
//! # Absolute range, printed as a search range filter
//! timespan resolve -t 2016-06-24T18:42/2016-06-24T18:52:30 --output filter
//!
//! # Ten minutes starting at a timestamp, with a word separator
//! timespan resolve -t "2016-06-24 18:42 TO +10m" --sep TO
//!
//! # Make TO the default separator
//! timespan config set --range-separator TO
//! timespan config get range-separator
//! ```

mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use timespan_core::{CivilZone, Resolver, Separator, TimeRange};

use crate::config::ConfigFile;

/// Expression used when `-t` is not given: the last hour.
const DEFAULT_EXPRESSION: &str = "1h";

#[derive(Parser)]
#[command(
    name = "timespan",
    version,
    about = "Resolve time expressions into query time ranges"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to <config dir>/timespan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a time expression into a start/end pair
    Resolve(ResolveArgs),
    /// Show or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Datetime, duration or range (e.g. 2h30m, 2016-06-24T18:42/+1h); defaults to the last hour
    #[arg(short = 't', long = "time", allow_hyphen_values = true)]
    time: Option<String>,

    /// Range separator (overrides the configured one; default "/")
    #[arg(long)]
    sep: Option<String>,

    /// Zone for datetimes without a trailing Z: local, utc or ±HH:MM
    #[arg(long)]
    zone: Option<String>,

    /// Resolve relative to this RFC 3339 instant instead of the system clock
    #[arg(long)]
    now: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Field name used by --output filter
    #[arg(long, default_value = "@timestamp")]
    field: String,

    /// Log every parsing step to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// `start:` / `end:` lines
    Text,
    /// The resolved range as JSON
    Json,
    /// A `range` query filter; an open end is closed at now
    Filter,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one setting, or all of them
    Get {
        /// range-separator, timezone or trace
        key: Option<String>,
    },
    /// Change settings
    Set {
        /// Default separator between the two ends of a range
        #[arg(long)]
        range_separator: Option<String>,
        /// Default zone for local datetimes: local, utc or ±HH:MM
        #[arg(long)]
        timezone: Option<String>,
        /// Log every parsing step by default
        #[arg(long)]
        trace: Option<bool>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // clap prints usage and exits
            Cli::parse_from(["timespan", "--help"]);
            unreachable!();
        }
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };

    match command {
        Commands::Resolve(args) => {
            let config = ConfigFile::load(&config_path)?;
            logging::init(args.trace || config.trace.unwrap_or(false));
            run_resolve(&args, &config)
        }
        Commands::Config { action } => {
            logging::init(false);
            run_config(action, &config_path)
        }
    }
}

fn run_resolve(args: &ResolveArgs, config: &ConfigFile) -> Result<()> {
    // Flag, then config file, then "/"
    let separator = match args.sep.as_deref() {
        Some(sep) => Separator::new(sep)?,
        None => config.separator()?.unwrap_or_default(),
    };
    let zone = match args.zone.as_deref() {
        Some(zone) => zone.parse::<CivilZone>().map_err(anyhow::Error::msg)?,
        None => config.zone()?.unwrap_or_default(),
    };
    let now = match args.now.as_deref() {
        Some(now) => DateTime::parse_from_rfc3339(now)
            .with_context(|| format!("Invalid --now value '{now}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let expression = args.time.as_deref().unwrap_or(DEFAULT_EXPRESSION);
    tracing::debug!(expression, %separator, %zone, %now, "resolve");

    let range = Resolver::new(separator, zone)
        .resolve(expression, now)
        .with_context(|| format!("Unable to interpret -t parameter '{expression}'"))?;

    println!("{}", render(&range, args, now)?);
    Ok(())
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn render(range: &TimeRange, args: &ResolveArgs, now: DateTime<Utc>) -> Result<String> {
    match args.output {
        OutputFormat::Text => {
            let end = range
                .end
                .map(|end| format_instant(end.instant))
                .unwrap_or_else(|| "-".to_string());
            Ok(format!(
                "start: {}\nend:   {}",
                format_instant(range.start.instant),
                end
            ))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(range)?),
        OutputFormat::Filter => {
            let filter = range.to_filter(now);
            let query = serde_json::json!({ "range": { args.field.clone(): filter } });
            Ok(serde_json::to_string_pretty(&query)?)
        }
    }
}

fn run_config(action: ConfigAction, path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = ConfigFile::load(path)?;
            match key {
                Some(key) => println!("{}", config.get(&key)?),
                None => {
                    for key in config::KEYS {
                        println!("{key} = {}", config.get(key)?);
                    }
                }
            }
        }
        ConfigAction::Set {
            range_separator,
            timezone,
            trace,
        } => {
            if range_separator.is_none() && timezone.is_none() && trace.is_none() {
                anyhow::bail!(
                    "Nothing to set. Use --range-separator, --timezone or --trace"
                );
            }
            let mut config = ConfigFile::load(path)?;
            config.apply(range_separator.as_deref(), timezone.as_deref(), trace)?;
            config
                .save(path)
                .with_context(|| format!("Failed to save config to {}", path.display()))?;
            tracing::info!(path = %path.display(), "config saved");
        }
    }
    Ok(())
}
