//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ASN_DB, DEFAULT_CITY_DB, DEFAULT_CONCURRENCY, DEFAULT_DELIMITER, DEFAULT_IP_COLUMN,
    DEFAULT_PROGRESS_INTERVAL, STDIO_PATH,
};
use crate::error_handling::ConfigError;
use crate::geoip::AttributeProfile;

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
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Built-in localization choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LocaleChoice {
    /// English names from the database
    None,
    /// Korean country and region names
    Ko,
}

/// Where localized names come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalizationSource {
    /// The built-in Korean table
    Korean,
    /// A JSON table file
    File(PathBuf),
}

/// Command-line options.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geoip_enrich",
    version,
    about = "Appends GeoLite2 city and ASN attributes to CSV records by IP column"
)]
pub struct Opt {
    /// Path to the city-level database
    #[arg(long = "cityDB", visible_alias = "city-db", default_value = DEFAULT_CITY_DB)]
    pub city_db: PathBuf,

    /// Path to the ASN database
    #[arg(long = "asnDB", visible_alias = "asn-db", default_value = DEFAULT_ASN_DB)]
    pub asn_db: PathBuf,

    /// Input file (default: stdin)
    #[arg(long = "in", visible_alias = "input")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(long = "out", visible_alias = "output")]
    pub output: Option<PathBuf>,

    /// Header name of the IP column
    #[arg(long = "ipColName", visible_alias = "ip-col-name", default_value = DEFAULT_IP_COLUMN)]
    pub ip_col_name: String,

    /// Field delimiter: one ASCII character, or "tab"
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// Records enriched concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Append the extended attribute set (geoname id, region code, accuracy radius, time zone)
    #[arg(long)]
    pub extended: bool,

    /// Localize country and region names with a built-in table
    #[arg(long, value_enum, default_value_t = LocaleChoice::None)]
    pub locale: LocaleChoice,

    /// JSON localization table (overrides --locale)
    #[arg(long)]
    pub locale_table: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Data records between progress log lines (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: usize,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use geoip_enrich::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: Some(PathBuf::from("access_log.csv")),
///     ip_column: "remote_addr".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// City-level database path
    pub city_db: PathBuf,

    /// ASN database path
    pub asn_db: PathBuf,

    /// Input file, or stdin when `None`
    pub input: Option<PathBuf>,

    /// Output file, or stdout when `None`
    pub output: Option<PathBuf>,

    /// Header name of the IP column
    pub ip_column: String,

    /// Field delimiter byte
    pub delimiter: u8,

    /// Records enriched concurrently
    pub concurrency: usize,

    /// Attributes appended to each record
    pub profile: AttributeProfile,

    /// Localization table, if names should be rewritten
    pub localization: Option<LocalizationSource>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Data records between progress log lines (0 disables)
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city_db: PathBuf::from(DEFAULT_CITY_DB),
            asn_db: PathBuf::from(DEFAULT_ASN_DB),
            input: None,
            output: None,
            ip_column: DEFAULT_IP_COLUMN.to_string(),
            delimiter: DEFAULT_DELIMITER,
            concurrency: DEFAULT_CONCURRENCY,
            profile: AttributeProfile::Basic,
            localization: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl TryFrom<Opt> for Config {
    type Error = ConfigError;

    fn try_from(opt: Opt) -> Result<Self, Self::Error> {
        if opt.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        let localization = match (opt.locale_table, opt.locale) {
            (Some(path), _) => Some(LocalizationSource::File(path)),
            (None, LocaleChoice::Ko) => Some(LocalizationSource::Korean),
            (None, LocaleChoice::None) => None,
        };
        Ok(Self {
            city_db: opt.city_db,
            asn_db: opt.asn_db,
            input: opt.input.filter(|p| p.as_os_str() != STDIO_PATH),
            output: opt.output.filter(|p| p.as_os_str() != STDIO_PATH),
            ip_column: opt.ip_col_name,
            delimiter: parse_delimiter(&opt.delimiter)?,
            concurrency: opt.concurrency,
            profile: if opt.extended {
                AttributeProfile::Extended
            } else {
                AttributeProfile::Basic
            },
            localization,
            log_level: opt.log_level,
            log_format: opt.log_format,
            progress_interval: opt.progress_interval,
        })
    }
}

/// Parses a delimiter argument into a single byte.
///
/// Accepts one ASCII character, or `tab` / `\t` for a tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw {
        "tab" | "\\t" => Ok(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
        },
    }
}
