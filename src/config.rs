//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::Settings;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "deepwork-timer")]
#[command(about = "A focus/break countdown engine served over a small HTTP API")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "4545")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus interval length in minutes
    #[arg(short, long, default_value = "45", value_parser = clap::value_parser!(u32).range(1..))]
    pub work: u32,

    /// Short break length in minutes
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub short_break: u32,

    /// Long break length in minutes
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..))]
    pub long_break: u32,

    /// Accumulated focus minutes after which the next break is long
    #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..))]
    pub threshold: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer settings taken from the command line
    pub fn settings(&self) -> Settings {
        Settings {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            acc_threshold: self.threshold,
        }
    }
}
