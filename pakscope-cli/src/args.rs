//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pakscope")]
#[command(version, about = "Packet inspector backend for game proxies", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the inspector server
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, default_value = "12000")]
        port: u16,

        /// Start a session for this platform right away (java, bedrock)
        #[arg(short = 'P', long, value_name = "PLATFORM")]
        platform: Option<String>,

        /// Read upstream packets as newline-delimited JSON from stdin
        #[arg(short, long)]
        ingest: bool,

        /// Directory the inspector loads context-menu icons from
        #[arg(long, value_name = "DIR", default_value = "icons")]
        icon_dir: String,
    },

    /// List proxy backends
    Backends,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log directive for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
