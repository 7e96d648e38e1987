//! CLI for inspecting transient-fault classification and retry settings.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{run_classify, run_config, run_decode, run_parse};

/// Top-level CLI for the tfault diagnostics tool.
#[derive(Debug, Parser)]
#[command(name = "tfault")]
#[command(about = "tfault: transient-fault classification and throttling decoder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Decode a throttling reason code.
    Decode {
        /// Packed reason code (as reported after "Code:" in error 40501).
        #[arg(allow_negative_numbers = true)]
        code: i32,
        /// Print the condition as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract and decode the reason code from a provider error message.
    Parse {
        /// Full error message text.
        message: String,
        /// Print the condition as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report whether a provider error with the given numbers would be retried.
    Classify {
        /// Sub-error numbers, primary first.
        #[arg(required_unless_present = "timeout", allow_negative_numbers = true)]
        numbers: Vec<i32>,
        /// Message attached to every sub-error (used to decode throttling).
        #[arg(long)]
        message: Option<String>,
        /// Use the network-connectivity classifier instead of the SQL one.
        #[arg(long)]
        network: bool,
        /// Classify a client-side timeout instead of a provider error.
        #[arg(long, conflicts_with = "numbers")]
        timeout: bool,
    },

    /// Show the config file location and the effective retry policies.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        tracing::debug!("command: {:?}", cli.command);

        match cli.command {
            CliCommand::Decode { code, json } => run_decode(code, json)?,
            CliCommand::Parse { message, json } => run_parse(&message, json)?,
            CliCommand::Classify {
                numbers,
                message,
                network,
                timeout,
            } => run_classify(&numbers, message.as_deref(), network, timeout),
            CliCommand::Config => run_config()?,
        }

        Ok(())
    }
}
