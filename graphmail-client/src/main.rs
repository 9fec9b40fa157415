//! graphmail command-line client.
//!
//! Usage:
//!   GRAPHMAIL_TOKEN=... graphmail messages --unread --from alice@contoso.com --top 20
//!
//! Token acquisition is out of scope; export a bearer token first.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use graphmail_client::{ClientConfig, GraphTransport, MessageQuery, StaticToken, logging};
use graphmail_model::catalog::message;
use graphmail_model::{Persisted, PropertyDefinition, PropertyValue};
use graphmail_types::{EntityKind, Mailbox};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const TOKEN_VAR: &str = "GRAPHMAIL_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "graphmail")]
#[command(about = "Query mailboxes over the Graph REST API")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List messages matching the given conditions
    Messages(MessagesArgs),
}

#[derive(Args, Debug)]
struct MessagesArgs {
    /// Mailbox owner (user principal name); defaults to the signed-in user
    #[arg(long)]
    mailbox: Option<String>,

    /// Folder display name or well-known name (inbox, sentitems, ...)
    #[arg(long)]
    folder: Option<String>,

    /// Only unread messages
    #[arg(long)]
    unread: bool,

    /// Sender address or display name
    #[arg(long)]
    from: Option<String>,

    /// Received on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Maximum number of messages to print
    #[arg(long, default_value = "10")]
    top: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::default(),
    };
    let token = StaticToken::from_env(TOKEN_VAR)?;
    let transport = GraphTransport::new(config, Arc::new(token))?;

    match cli.command {
        Command::Messages(args) => list_messages(&transport, args).await,
    }
}

async fn list_messages(transport: &GraphTransport, args: MessagesArgs) -> Result<()> {
    let mailbox = match args.mailbox {
        Some(upn) => Mailbox::user(upn).context("invalid --mailbox")?,
        None => Mailbox::Me,
    };
    let folder = match &args.folder {
        Some(name) => Some(
            transport
                .resolve_folder(&mailbox, name)
                .await
                .with_context(|| format!("cannot resolve folder {name:?}"))?,
        ),
        None => None,
    };
    let query = MessageQuery {
        unread_only: args.unread,
        from: args.from,
        since: args.since,
    };
    let filter = query.to_filter()?;
    if let Some(filter) = &filter {
        info!("Filter: {}", filter.fragment()?);
    }

    let messages = transport
        .find_items(
            EntityKind::Message,
            &mailbox,
            folder.as_ref(),
            filter.as_ref(),
            args.top,
        )
        .await?;
    for item in &messages {
        println!("{}", summary_line(item));
    }
    info!("{} message(s)", messages.len());
    Ok(())
}

fn summary_line(item: &Persisted) -> String {
    let unread = item
        .bag
        .get(&message::IS_READ)
        .ok()
        .flatten()
        .and_then(PropertyValue::as_bool)
        == Some(false);
    format!(
        "{} {:<16} {:<24} {}",
        if unread { '*' } else { ' ' },
        display(item, &message::RECEIVED_DATE_TIME),
        display(item, &message::FROM),
        display(item, &message::SUBJECT),
    )
}

fn display(item: &Persisted, property: &PropertyDefinition) -> String {
    match item.bag.get(property).ok().flatten() {
        Some(PropertyValue::String(s)) => s.clone(),
        Some(PropertyValue::DateTime(dt)) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Some(PropertyValue::Recipient(r)) => r.name.clone().unwrap_or_else(|| r.address.clone()),
        _ => String::new(),
    }
}
