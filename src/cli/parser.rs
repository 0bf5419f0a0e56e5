use crate::config::{Config, StorageMode};
use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for asmanager
#[derive(Parser)]
#[command(
    name = "asmanager",
    version = env!("CARGO_PKG_VERSION"),
    about = "After-service claim tracking server: general items, converters and floodlights over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path
    #[arg(global = true, long = "db", env = "ASMANAGER_DB")]
    pub db: Option<String>,

    /// Use this configuration file instead of the default one
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Server settings; accepted before or after `serve`, and read when no
    /// subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Server")]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,

    /// Storage backend
    #[arg(long, global = true, value_enum, env = "ASMANAGER_STORAGE")]
    pub storage: Option<StorageMode>,

    /// Directory served at `/` and for static assets
    #[arg(long = "static-dir", global = true)]
    pub static_dir: Option<String>,
}

impl ServeArgs {
    /// Overwrite the config values that were given on the command line or
    /// through the environment.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(host) = &self.host {
            cfg.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(storage) = self.storage {
            cfg.storage = storage;
        }
        if let Some(dir) = &self.static_dir {
            cfg.static_dir = dir.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Initialize the configuration file and the database schema
    Init,

    /// Show or validate the configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check that the configuration file parses")]
        check: bool,
    },

    /// Inspect the SQLite database
    Db {
        #[arg(long = "info", help = "Show database information")]
        info: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,
    },

    /// Export one category to a file
    Export {
        /// Category key: general, converter or floodlight
        category: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file
        #[arg(long)]
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
