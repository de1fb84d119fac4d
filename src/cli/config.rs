use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{Level, warn};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "Heuristic form autofill for UI test automation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file (default: form-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Seed options shared by all fill commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// Seed data: JSON (object for per-field values, scalar for every field) or plain text
    #[arg(long)]
    pub seed: Option<String>,

    /// Use a date as the seed (YYYY-MM-DD)
    #[arg(long, conflicts_with = "seed")]
    pub seed_date: Option<String>,

    /// Seed for the random fallback generator (reproducible fills)
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill a form described by a YAML fixture (no browser needed)
    Fill {
        /// Path to the form fixture YAML file
        #[arg(long)]
        fixture: String,

        #[command(flatten)]
        seed: SeedArgs,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,

        /// Submit the form after filling
        #[arg(long)]
        submit: bool,

        /// Append a JSONL decision trace to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Fill a live page through the browser server
    Live {
        /// URL to open before filling
        #[arg(long)]
        url: String,

        /// CSS selector of the form or controls to fill
        #[arg(long, default_value = "form")]
        selector: String,

        #[command(flatten)]
        seed: SeedArgs,

        /// Submit the form after filling
        #[arg(long)]
        submit: bool,

        /// Path to the browser server script (overrides config)
        #[arg(long)]
        script: Option<String>,

        /// Append a JSONL decision trace to this file
        #[arg(long)]
        trace: Option<String>,
    },
}

/// Log level from `--quiet` and the `-v` count.
pub fn log_level(quiet: bool, verbose: u8) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autofill.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed RNG seed; entropy when absent
    pub rng_seed: Option<u64>,

    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            min_length: 8,
            max_length: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_script")]
    pub script: String,

    /// Settle time after submitting, in milliseconds
    #[serde(default = "default_wait")]
    pub after_submit_wait_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            after_submit_wait_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_min_length() -> usize { 8 }
fn default_max_length() -> usize { 16 }
fn default_script() -> String { "browser_server.js".to_string() }
fn default_wait() -> u64 { 500 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing,
/// and defaults with a warning if it is malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-autofill.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// RNG seed to use: CLI flag first, then config.
pub fn resolve_rng_seed(cli: Option<u64>, config: &GeneratorConfig) -> Option<u64> {
    cli.or(config.rng_seed)
}

/// Trace file to use: CLI flag first, then config.
pub fn resolve_trace_path<'a>(cli: Option<&'a str>, config: &'a TraceConfig) -> Option<&'a str> {
    cli.or(config.path.as_deref())
}
