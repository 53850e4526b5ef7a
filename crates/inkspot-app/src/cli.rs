//! CLI argument definitions for the Ink Spot application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use inkspot_core::config::default_config_path;

/// The Ink Spot: notary site chat assistant and mock backend.
#[derive(Parser, Debug)]
#[command(name = "inkspot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Chat with the site assistant in the terminal.
    Chat,
    /// Print the assistant's reply to one message and exit.
    Ask {
        /// The message, as one or more words.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Run the mock backend HTTP server.
    Serve {
        /// API server port.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
        /// Answer immediately instead of simulating network latency.
        #[arg(long = "no-latency")]
        no_latency: bool,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > INKSPOT_CONFIG env var > ~/.inkspot/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("INKSPOT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter used when RUST_LOG is unset.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

impl Command {
    /// Resolve the API server port for `serve`.
    ///
    /// Priority: --port flag > INKSPOT_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Command::Serve { port: Some(p), .. } = self {
            return *p;
        }
        if let Ok(val) = std::env::var("INKSPOT_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        config_port
    }
}
