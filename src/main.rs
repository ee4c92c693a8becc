//! Crisp Exporter - export Crisp chat conversations to a spreadsheet.
//!
//! Pulls every conversation page and each conversation's messages from the Crisp
//! REST API, strictly one request at a time, then flattens them into rows of
//! `session_id, sender, text, timestamp` and writes an `.xlsx` workbook.
//!
//! QUICK START:
//!   crisp-export config set --identifier <id> --key <key> --website-id <site>
//!   crisp-export conversations            # List all conversations
//!   crisp-export messages --copy          # Copy message groups as JSON
//!   crisp-export export                   # Save crisp_export.xlsx

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    export_to_spreadsheet, fetch_all_conversations, fetch_messages_for, flatten,
    format_conversations_table, format_groups_table, format_stats, parse_conversations_json,
    parse_date_bound, to_clipboard_text, DateBound, FetchProgress, OutputFormat, SHEET_NAME,
};
use cli::{Cli, Commands, ConfigAction, DateArgs};
use domain::{AppConfig, AppError, Conversation, Credentials, DateFilter, ExportStats};
use infrastructure::{
    copy_to_clipboard, ensure_config_exists, load_config, save_config, ConversationSource,
    CrispClient,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if matches!(e, AppError::MissingCredentials { .. }) {
            eprintln!(
                "Run `crisp-export config set --identifier <id> --key <key> --website-id <site>` \
                 or set CRISP_IDENTIFIER, CRISP_KEY and CRISP_WEBSITE_ID."
            );
        } else if e.is_fetch() {
            eprintln!("Nothing was exported. Check the website id and token scopes, then retry.");
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|message| AppError::Config { message })?;

    match cli.command {
        Commands::Conversations {
            dates,
            copy,
            output,
        } => {
            cmd_conversations(&dates, copy, output.as_deref(), format).await?;
        }
        Commands::Messages {
            dates,
            conversations,
            copy,
            output,
        } => {
            cmd_messages(
                &dates,
                conversations.as_deref(),
                copy,
                output.as_deref(),
                format,
            )
            .await?;
        }
        Commands::Export {
            dates,
            conversations,
            output,
        } => {
            cmd_export(&dates, conversations.as_deref(), output).await?;
        }
        Commands::Config { action } => {
            cmd_config(action)?;
        }
    }

    Ok(())
}

/// Everything a fetching command needs: validated credentials and a client.
struct Session {
    config: AppConfig,
    credentials: Credentials,
    client: CrispClient,
}

impl Session {
    /// Load config (with environment overrides) and fail fast on missing credentials.
    fn open() -> domain::Result<Self> {
        let config = load_config()?.with_env_overrides();
        let credentials = config.credentials()?;
        let client = CrispClient::new(&config.crisp)?;

        tracing::debug!(?credentials, api_url = %config.crisp.api_url, "Session ready");

        Ok(Self {
            config,
            credentials,
            client,
        })
    }
}

/// Fetch and list all conversations.
async fn cmd_conversations(
    dates: &DateArgs,
    copy: bool,
    output: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<()> {
    let session = Session::open()?;
    let filter = date_filter(dates)?;

    let conversations = fetch_conversations(&session.client, &session.credentials, &filter).await?;

    if conversations.is_empty() {
        warn("No conversations found!");
        return Ok(());
    }

    success(&format!("Found {} conversations", conversations.len()));

    match format {
        OutputFormat::Table => println!("{}", format_conversations_table(&conversations)),
        OutputFormat::Json => println!("{}", to_clipboard_text(&conversations)?),
    }

    deliver_json(&conversations, conversations.len(), "conversations", copy, output)
}

/// Fetch the messages of every conversation.
async fn cmd_messages(
    dates: &DateArgs,
    conversations_file: Option<&Path>,
    copy: bool,
    output: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<()> {
    let session = Session::open()?;
    let conversations = load_conversations(&session, dates, conversations_file).await?;

    if conversations.is_empty() {
        warn("Please load conversations first!");
        return Ok(());
    }

    let groups = {
        let mut line = ProgressLine::new();
        fetch_messages_for(
            &session.client,
            &conversations,
            &session.credentials,
            |p| line.update(p),
        )
        .await?
    };

    success(&format!("Loaded messages for {} conversations", groups.len()));

    match format {
        OutputFormat::Table => {
            println!("{}", format_groups_table(&groups));
            println!();
            println!("{}", format_stats(&ExportStats::from_groups(&groups)));
        }
        OutputFormat::Json => println!("{}", to_clipboard_text(&groups)?),
    }

    deliver_json(&groups, groups.len(), "message groups", copy, output)
}

/// Run the full pipeline and write the workbook.
async fn cmd_export(
    dates: &DateArgs,
    conversations_file: Option<&Path>,
    output: Option<PathBuf>,
) -> domain::Result<()> {
    let session = Session::open()?;
    let conversations = load_conversations(&session, dates, conversations_file).await?;

    if conversations.is_empty() {
        warn("No conversations found, nothing to export.");
        return Ok(());
    }

    let groups = {
        let mut line = ProgressLine::new();
        fetch_messages_for(
            &session.client,
            &conversations,
            &session.credentials,
            |p| line.update(p),
        )
        .await?
    };

    let rows = flatten(&groups);
    if rows.is_empty() {
        warn("No messages found, nothing to export.");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&session.config.export.file_name));
    export_to_spreadsheet(&rows, &path)?;

    success(&format!(
        "Exported {} messages to {} (sheet \"{}\")",
        rows.len(),
        path.display(),
        SHEET_NAME
    ));
    println!();
    println!("{}", format_stats(&ExportStats::from_groups(&groups)));

    Ok(())
}

/// Manage stored credentials.
fn cmd_config(action: ConfigAction) -> domain::Result<()> {
    match action {
        ConfigAction::Set {
            identifier,
            key,
            website_id,
        } => {
            if identifier.is_none() && key.is_none() && website_id.is_none() {
                return Err(AppError::usage(
                    "Nothing to save: pass --identifier, --key and/or --website-id",
                ));
            }

            let mut config = load_config()?;
            if identifier.is_some() {
                config.crisp.identifier = identifier;
            }
            if key.is_some() {
                config.crisp.key = key;
            }
            if website_id.is_some() {
                config.crisp.website_id = website_id;
            }
            save_config(&config)?;

            success("Settings saved!");
            if let Err(e) = config.credentials() {
                warn(&e.to_string());
            }
        }
        ConfigAction::Show => {
            let config = load_config()?.with_env_overrides();
            let show = |value: Option<&str>| {
                value.map_or_else(|| "(missing)".red().to_string(), ToString::to_string)
            };

            println!("{}", "⚙️  Configuration".bold());
            println!();
            println!("  Identifier:  {}", show(config.crisp.identifier.as_deref()));
            println!(
                "  Key:         {}",
                show(config.crisp.key.as_deref().map(domain::config::mask_secret).as_deref())
            );
            println!("  Website ID:  {}", show(config.crisp.website_id.as_deref()));
            println!("  API URL:     {}", config.crisp.api_url);
            println!("  Timeout:     {}s", config.crisp.timeout_secs);
            println!("  Export file: {}", config.export.file_name);
            println!();
            println!("  File: {}", AppConfig::config_file_path().display());
        }
        ConfigAction::Path => {
            println!("{}", AppConfig::config_file_path().display());
        }
        ConfigAction::Init => {
            ensure_config_exists()?;
            success(&format!(
                "Configuration file: {}",
                AppConfig::config_file_path().display()
            ));
        }
    }

    Ok(())
}

/// Conversations from a saved JSON file, or fetched from the API.
async fn load_conversations(
    session: &Session,
    dates: &DateArgs,
    file: Option<&Path>,
) -> domain::Result<Vec<Conversation>> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;
            let conversations = parse_conversations_json(&content)?;
            tracing::info!(
                path = %path.display(),
                conversations = conversations.len(),
                "Loaded conversations from file"
            );
            Ok(conversations)
        }
        None => {
            let filter = date_filter(dates)?;
            let conversations =
                fetch_conversations(&session.client, &session.credentials, &filter).await?;
            if !conversations.is_empty() {
                success(&format!("Found {} conversations", conversations.len()));
            }
            Ok(conversations)
        }
    }
}

/// Aggregate every conversation page with a live progress line.
async fn fetch_conversations(
    source: &dyn ConversationSource,
    credentials: &Credentials,
    filter: &DateFilter,
) -> domain::Result<Vec<Conversation>> {
    let mut line = ProgressLine::new();
    fetch_all_conversations(source, credentials, filter, |p| line.update(p)).await
}

fn date_filter(dates: &DateArgs) -> domain::Result<DateFilter> {
    Ok(DateFilter {
        start: dates
            .date_start
            .as_deref()
            .map(|d| parse_date_bound(d, DateBound::Start))
            .transpose()?,
        end: dates
            .date_end
            .as_deref()
            .map(|d| parse_date_bound(d, DateBound::End))
            .transpose()?,
    })
}

/// Copy and/or write the JSON form of `items`.
fn deliver_json<T: Serialize + ?Sized>(
    items: &T,
    count: usize,
    label: &str,
    copy: bool,
    output: Option<&Path>,
) -> domain::Result<()> {
    if !copy && output.is_none() {
        return Ok(());
    }

    let text = to_clipboard_text(items)?;

    if let Some(path) = output {
        std::fs::write(path, &text)
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;
        success(&format!("Wrote {count} {label} to {}", path.display()));
    }

    if copy {
        copy_to_clipboard(&text)?;
        success(&format!("Copied {count} {label} to clipboard"));
    }

    Ok(())
}

fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

fn warn(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Single-line progress indicator on stderr, cleared when dropped so it
/// disappears on success and failure alike.
struct ProgressLine {
    interactive: bool,
    drawn: bool,
}

impl ProgressLine {
    fn new() -> Self {
        Self {
            interactive: std::io::stderr().is_terminal(),
            drawn: false,
        }
    }

    fn update(&mut self, progress: FetchProgress) {
        if self.interactive {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[2K⏳ {}", progress.to_string().blue());
            let _ = stderr.flush();
            self.drawn = true;
        } else {
            tracing::info!("{progress}");
        }
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        if self.drawn {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }
    }
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
