//! Startup helpers and the interactive terminal chat.
//!
//! The terminal loop plays the role of the view layer: it renders the
//! session, feeds user input to it, and unmounts it (cancelling pending
//! replies) on exit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};

use crate::chat::core::category::Category;
use crate::chat::core::config::{ChatConfig, ENV_PREFIX};
use crate::chat::core::errors::ChatError;
use crate::chat::core::message::{Message, Sender};
use crate::chat::markup::{EmphasisParser, Span};
use crate::chat::ports::clock::SystemClock;
use crate::chat::ports::random::RngSource;
use crate::chat::ports::storage::JsonFileStore;
use crate::chat::pump::{ReplyPump, SharedSession};
use crate::chat::session::{ChatSession, SubmitOutcome};
use crate::dashboard::clients::{ClientRecord, filter_clients, normalize_clients};
use crate::dashboard::preferences::Preferences;

/// Initialize tracing; `RUST_LOG` refines the default `info` level.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = installed {
        tracing::warn!("Keeping existing tracing subscriber: {e}");
    }
}

/// Run the terminal chat (used by the `meeting-assistant` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on a clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting meeting assistant v{}", env!("CARGO_PKG_VERSION"));

    let config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_terminal(config)) {
        tracing::error!("Chat error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Rejected terminal input.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The `/name` is not a known command.
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    /// `/select` needs a 1-based number.
    #[error("not a conversation number: {0:?}")]
    BadConversationNumber(String),
    /// The category argument did not parse.
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// A parsed line of terminal input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Show the command list.
    Help,
    /// List conversations.
    List,
    /// Filter conversations by title or preview.
    Search(String),
    /// Start a conversation, optionally in a given category.
    New(Option<Category>),
    /// Select the n-th listed conversation (1-based).
    Select(usize),
    /// Switch the active conversation's category.
    Switch(Category),
    /// Toggle the persisted theme.
    Theme,
    /// Search the demo client list.
    Clients(String),
    /// Leave the chat.
    Quit,
    /// Send text to the active conversation.
    Say(String),
}

/// Parse one input line. Text not starting with `/` is sent verbatim.
///
/// # Errors
/// Returns `Unknown` or `BadConversationNumber`, or wraps
/// `ChatError::InvalidCategory` for an unknown category.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, arg)| (name, arg.trim()));

    match name {
        "help" | "h" => Ok(Command::Help),
        "list" | "ls" => Ok(Command::List),
        "search" => Ok(Command::Search(arg.to_string())),
        "new" if arg.is_empty() => Ok(Command::New(None)),
        "new" => Ok(Command::New(Some(arg.parse()?))),
        "select" | "open" => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Command::Select)
            .ok_or_else(|| CommandError::BadConversationNumber(arg.to_string())),
        "switch" => Ok(Command::Switch(arg.parse()?)),
        "theme" => Ok(Command::Theme),
        "clients" => Ok(Command::Clients(arg.to_string())),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

const HELP: &str = "\
  /list                 list conversations
  /search <text>        filter conversations
  /new [company|personal] start a conversation
  /select <n>           open conversation n from /list
  /switch <category>    switch the open conversation's category
  /clients [text]       search clients
  /theme                toggle light/dark theme
  /quit                 leave
  anything else         send a message";

fn demo_clients() -> serde_json::Value {
    json!([
        {"id": "cl-001", "name": "Northwind Traders", "industry": "Logistics", "email": "pm@northwind.example"},
        {"_id": "cl-002", "client_name": "Fabrikam", "industry": "Manufacturing"},
        {"client_id": 3, "company_name": "Tailspin Toys", "industry": "Retail"},
        {"id": 4, "name": "Contoso", "email": "ops@contoso.example"},
        {"id": "cl-005", "name": "Acme Corp", "industry": "Consumer goods"}
    ])
}

const PREFS_FILE: &str = "prefs.json";

/// Where preferences live: `MEETING_ASSISTANT_PREFS_PATH`, else the user's
/// config directory (`$XDG_CONFIG_HOME` or `$HOME/.config`).
fn prefs_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(explicit) = non_empty(&format!("{ENV_PREFIX}PREFS_PATH")) {
        return PathBuf::from(explicit);
    }
    let config_dir = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("meeting-assistant").join(PREFS_FILE)
}

fn open_prefs() -> anyhow::Result<Preferences<JsonFileStore>> {
    let path = prefs_path(|key| std::env::var(key).ok());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), "Opening preferences");
    Ok(Preferences::new(JsonFileStore::open(path)?))
}

/// Render message content with strong spans in ANSI bold.
#[must_use]
pub fn render_content(parser: &EmphasisParser, content: &str) -> String {
    parser
        .split(content)
        .iter()
        .map(|span| match span {
            Span::Plain(text) => text.clone(),
            Span::Strong(text) => format!("\x1b[1m{text}\x1b[0m"),
        })
        .collect()
}

fn render_message(parser: &EmphasisParser, message: &Message) -> String {
    let who = match (message.sender, message.category) {
        (Sender::User, _) => "you".to_string(),
        (Sender::Assistant, Some(category)) => format!("assistant [{}]", category.label()),
        (Sender::Assistant, None) => "assistant".to_string(),
    };
    format!(
        "  {} {who}> {}",
        message.timestamp.format("%H:%M"),
        render_content(parser, &message.content)
    )
}

async fn print_conversation(session: &SharedSession, parser: &EmphasisParser) {
    let guard = session.lock().await;
    if let Some(conversation) = guard.active_conversation() {
        println!("== {} ({}) ==", conversation.title(), conversation.category().label());
        for message in conversation.messages() {
            println!("{}", render_message(parser, message));
        }
    }
}

async fn print_list(session: &SharedSession, query: Option<&str>) {
    let guard = session.lock().await;
    let active = guard.active_conversation_id();
    let shown = guard.registry().search(query.unwrap_or_default());
    for (index, conversation) in guard.conversations().iter().enumerate() {
        if !shown.iter().any(|c| c.id() == conversation.id()) {
            continue;
        }
        let marker = if conversation.id() == active { '*' } else { ' ' };
        println!(
            "{marker} {:>2}. {} [{}] {}",
            index + 1,
            conversation.title(),
            conversation.category().label(),
            conversation.last_message_preview()
        );
    }
}

fn print_clients(clients: &[ClientRecord], query: &str) {
    let hits = filter_clients(clients, query);
    if hits.is_empty() {
        println!("  no clients match {query:?}");
    }
    for client in hits {
        println!(
            "  {} {} {} {}",
            client.id,
            client.name,
            client.industry.as_deref().unwrap_or("-"),
            client.email.as_deref().unwrap_or("-")
        );
    }
}

async fn handle_command(
    command: Command,
    session: &SharedSession,
    parser: &EmphasisParser,
    prefs: &Preferences<JsonFileStore>,
    clients: &[ClientRecord],
) -> anyhow::Result<bool> {
    match command {
        Command::Help => println!("{HELP}"),
        Command::List => print_list(session, None).await,
        Command::Search(query) => print_list(session, Some(&query)).await,
        Command::New(category) => {
            {
                let mut guard = session.lock().await;
                let id = match category {
                    Some(category) => guard.create_conversation(category),
                    None => guard.start_new_conversation(),
                };
                tracing::debug!(%id, "Started conversation from terminal");
            }
            print_conversation(session, parser).await;
        }
        Command::Select(n) => {
            {
                let mut guard = session.lock().await;
                let Some(id) = guard.conversations().get(n - 1).map(|c| c.id()) else {
                    println!("  no conversation #{n}");
                    return Ok(true);
                };
                guard.select_conversation(id)?;
            }
            print_conversation(session, parser).await;
        }
        Command::Switch(category) => {
            let mut guard = session.lock().await;
            guard.switch_active_category(category)?;
            if let Some(last) = guard.active_conversation().and_then(|c| c.last_message()) {
                println!("{}", render_message(parser, last));
            }
        }
        Command::Theme => println!("  theme: {}", prefs.toggle_theme()?),
        Command::Clients(query) => print_clients(clients, &query),
        Command::Quit => return Ok(false),
        Command::Say(text) => {
            let mut guard = session.lock().await;
            guard.set_composing_text(text);
            match guard.submit_composed()? {
                SubmitOutcome::Accepted { .. } => println!("  (assistant is typing...)"),
                SubmitOutcome::IgnoredWaiting => {
                    guard.set_composing_text(String::new());
                    println!("  (still waiting for the previous reply)");
                }
                SubmitOutcome::IgnoredEmpty => {}
            }
        }
    }
    Ok(true)
}

async fn run_terminal(config: ChatConfig) -> anyhow::Result<()> {
    let prefs = open_prefs()?;
    let parser = EmphasisParser::new()?;
    let clients = normalize_clients(&demo_clients())?;

    let tick = config.pump_tick();
    let session = ChatSession::new(config, Arc::new(SystemClock), Box::new(RngSource::from_entropy()))?;
    let session: SharedSession = Arc::new(Mutex::new(session));

    let (tx, mut replies) = mpsc::unbounded_channel();
    let pump = ReplyPump::new(Arc::clone(&session), tick).with_listener(tx);
    let shutdown = pump.shutdown_notifier();
    let pump_handle = pump.spawn();

    println!("Meeting assistant (theme: {}). Type /help for commands.", prefs.theme()?);
    print_list(&session, None).await;
    print_conversation(&session, &parser).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let keep_going = match parse_command(&line) {
                    Ok(command) => handle_command(command, &session, &parser, &prefs, &clients).await?,
                    Err(err) => {
                        println!("  {err}");
                        true
                    }
                };
                if !keep_going {
                    break;
                }
            }
            Some(reply) = replies.recv() => {
                let guard = session.lock().await;
                if reply.conversation_id == guard.active_conversation_id() {
                    println!("{}", render_message(&parser, &reply.message));
                } else if let Some(conversation) = guard.registry().get(reply.conversation_id) {
                    println!("  (new reply in \"{}\")", conversation.title());
                }
            }
        }
    }

    shutdown.notify_one();
    pump_handle.await?;
    tracing::info!("Chat closed");
    Ok(())
}
