//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::OutputFormat;

/// Crisp Exporter - export Crisp conversations and messages to a spreadsheet.
///
/// Typical run: crisp-export config set ... && crisp-export export
#[derive(Parser, Debug)]
#[command(name = "crisp-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: table or json.
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Optional date window for the conversation listing.
#[derive(Args, Debug, Clone, Default)]
pub struct DateArgs {
    /// Only conversations updated at or after this date (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub date_start: Option<String>,

    /// Only conversations updated at or before this date (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub date_end: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all conversations (every page) and list them.
    Conversations {
        #[command(flatten)]
        dates: DateArgs,

        /// Copy the conversations as JSON to the clipboard.
        ///
        /// On Linux without a clipboard manager the copied text is lost when the
        /// command exits; use --output there.
        #[arg(long)]
        copy: bool,

        /// Write the conversations as JSON to a file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the messages of every conversation.
    Messages {
        #[command(flatten)]
        dates: DateArgs,

        /// Read conversations from a JSON file instead of fetching them.
        #[arg(long)]
        conversations: Option<PathBuf>,

        /// Copy the message groups as JSON to the clipboard.
        ///
        /// On Linux without a clipboard manager the copied text is lost when the
        /// command exits; use --output there.
        #[arg(long)]
        copy: bool,

        /// Write the message groups as JSON to a file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch conversations and messages and save them to an .xlsx file.
    Export {
        #[command(flatten)]
        dates: DateArgs,

        /// Read conversations from a JSON file instead of fetching them.
        #[arg(long)]
        conversations: Option<PathBuf>,

        /// Output workbook path (defaults to the configured file name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage stored Crisp credentials.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Store credentials (only the given values are changed).
    Set {
        /// Plugin token identifier.
        #[arg(long)]
        identifier: Option<String>,

        /// Plugin token key.
        #[arg(long)]
        key: Option<String>,

        /// Website id.
        #[arg(long)]
        website_id: Option<String>,
    },

    /// Show the effective configuration (key masked).
    Show,

    /// Print the configuration file path.
    Path,

    /// Create a commented configuration file if none exists.
    Init,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
