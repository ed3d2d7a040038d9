//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{API_KEY_ENV, DB_PATH};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use geo_address::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./addresses.db"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Normalize one JSON payload per line
/// geo_address import payloads.jsonl
///
/// # Collapse duplicate localities in a custom database
/// geo_address --db-path ./custom.db dedupe
///
/// # Print the hidden form fields for address 42
/// GOOGLE_API_KEY=... geo_address fields 42 --name address
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "geo_address",
    about = "Normalizes geocoded addresses into a deduplicated SQLite hierarchy."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `geo_address` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize address payloads, one JSON value per line ("-" for stdin)
    Import {
        /// Input file
        file: PathBuf,
    },
    /// Collapse duplicate locality rows
    Dedupe,
    /// Print the components of a stored address as JSON
    Show {
        /// Address id
        id: i64,
    },
    /// Print the hidden form inputs for a stored address
    Fields {
        /// Address id
        id: i64,
        /// Form field name used as the input prefix
        #[arg(long, default_value = "address")]
        name: String,
        /// Geocoding API key
        #[arg(long, env = API_KEY_ENV, default_value = "")]
        api_key: String,
        /// Use the map-enabled widget script
        #[arg(long)]
        show_map: bool,
    },
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Config {
            db_path: opt.db_path.clone(),
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
        }
    }
}
