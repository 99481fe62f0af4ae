//! Console front end for numsift.
//!
//! Plays the chat transport in a terminal: text lines become messages,
//! `/file` uploads a local file, and `#n` presses the n-th button of the
//! most recent keyboard.

mod command;
mod console;
mod helper;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use command::ReplCommand;
use console::{ConsoleRenderTarget, Pressed};
use helper::CliHelper;
use numsift_application::{Dispatcher, EventKind, InboundEvent, Renderer, SessionUseCase};
use numsift_core::config::RootConfig;
use numsift_core::gate::{AccessGate, MembershipOracle};
use numsift_core::session::{OwnerId, SessionStore};
use numsift_infrastructure::{
    BotApiMembershipOracle, ConfigService, FileDocumentDecoder, FileExporter,
    StaticMembershipOracle,
};

#[derive(Parser)]
#[command(name = "numsift")]
#[command(about = "numsift - sift phone numbers out of text and files", long_about = None)]
struct Cli {
    /// Owner id the console speaks as
    #[arg(long, default_value_t = 1)]
    user_id: OwnerId,

    /// Config file (defaults to ~/.config/numsift/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The membership oracle, plus the static table when that is what backs it.
fn build_oracle(
    config: &RootConfig,
) -> (Arc<dyn MembershipOracle>, Option<Arc<StaticMembershipOracle>>) {
    match config.bot.api_token.as_deref() {
        Some(token) => {
            tracing::info!("Checking membership through the Bot API");
            let oracle: Arc<dyn MembershipOracle> = Arc::new(BotApiMembershipOracle::new(token));
            (oracle, None)
        }
        None => {
            tracing::info!("Checking membership against the static table");
            let table = Arc::new(StaticMembershipOracle::new(config.membership.clone()));
            let oracle: Arc<dyn MembershipOracle> = table.clone();
            (oracle, Some(table))
        }
    }
}

/// Copies an upload into the temp dir, the way a transport downloads it.
async fn stage_upload(temp_dir: &Path, owner: OwnerId, source: &Path) -> Result<(String, PathBuf)> {
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("'{}' has no file name", source.display()))?
        .to_string();
    tokio::fs::create_dir_all(temp_dir).await?;
    let staged = temp_dir.join(format!("{owner}_{file_name}"));
    tokio::fs::copy(source, &staged)
        .await
        .with_context(|| format!("Failed to read {}", source.display()))?;
    Ok((file_name, staged))
}

fn print_help() {
    let lines = [
        "/start            start a new session",
        "/stop             end the session",
        "<text>            send a message",
        "/file <path>      upload a txt, csv, xls or xlsx file",
        "#n, /press n      press button n of the latest keyboard",
        "/join [n]         join required channel n (all when omitted)",
        "/show             reprint the latest keyboard message",
        "quit              exit",
    ];
    for line in lines {
        println!("{}", line.bright_black());
    }
    println!();
}

fn spawn_dispatch(
    tasks: &mut JoinSet<()>,
    dispatcher: &Arc<Dispatcher>,
    event: InboundEvent,
    cleanup: Option<PathBuf>,
) {
    let dispatcher = Arc::clone(dispatcher);
    tasks.spawn(async move {
        if let Err(e) = dispatcher.dispatch(event).await {
            eprintln!("{}", format!("Delivery failed: {e:#}").red());
        }
        if let Some(path) = cleanup {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.get_config()?;
    init_tracing(&config.bot.log_level);
    tracing::debug!("Using config {}", config_service.path().display());

    // ===== Backend Initialization =====
    let (oracle, static_oracle) = build_oracle(&config);
    let gate = Arc::new(AccessGate::new(config.channels.clone(), oracle));
    let store = Arc::new(SessionStore::new(config.session));
    let usecase = Arc::new(SessionUseCase::new(
        store,
        gate,
        Arc::new(FileDocumentDecoder),
        Arc::new(FileExporter),
        config.bot.text_limit,
    ));
    let temp_dir = PathBuf::from(&config.bot.temp_dir);
    let console = Arc::new(ConsoleRenderTarget::new(&temp_dir));
    let renderer = Arc::new(Renderer::new(console.clone()));
    let dispatcher = Arc::new(Dispatcher::new(usecase.clone(), renderer));
    let owner = cli.user_id;

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== numsift ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Speaking as user {owner}. Type '/help' for commands, '/start' to begin.")
            .bright_black()
    );
    println!();

    let mut tasks = JoinSet::new();

    // ===== Main REPL Loop =====
    loop {
        while tasks.try_join_next().is_some() {}

        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        let command = match command::parse(trimmed) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                continue;
            }
        };

        let kind = match command {
            ReplCommand::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ReplCommand::Help => {
                print_help();
                continue;
            }
            ReplCommand::Show => {
                if !console.show_active() {
                    println!("{}", "Nothing to show yet.".bright_black());
                }
                continue;
            }
            ReplCommand::Join(index) => {
                let Some(table) = &static_oracle else {
                    println!("{}", "Membership comes from the Bot API; join in the app.".yellow());
                    continue;
                };
                let channels = usecase.channels();
                let selected: Vec<_> = match index {
                    Some(n) => channels.get(n - 1).into_iter().collect(),
                    None => channels.iter().collect(),
                };
                if selected.is_empty() {
                    println!("{}", "No such channel.".yellow());
                }
                for channel in selected {
                    table.grant(&channel.chat_id, owner).await;
                    println!("{}", format!("Joined {}", channel.name).green());
                }
                continue;
            }
            ReplCommand::Press(index) => match console.press(index) {
                Some(Pressed::Callback { message, data }) => EventKind::Button { message, data },
                Some(Pressed::Link(url)) => {
                    println!("{}", format!("Link: {url}").bright_magenta());
                    continue;
                }
                None => {
                    println!("{}", format!("No button #{index}.").yellow());
                    continue;
                }
            },
            ReplCommand::File(source) => match stage_upload(&temp_dir, owner, &source).await {
                Ok((file_name, path)) => {
                    let event = InboundEvent {
                        owner,
                        kind: EventKind::Document {
                            file_name,
                            path: path.clone(),
                        },
                    };
                    spawn_dispatch(&mut tasks, &dispatcher, event, Some(path));
                    continue;
                }
                Err(e) => {
                    println!("{}", format!("{e:#}").red());
                    continue;
                }
            },
            ReplCommand::Start => EventKind::Start,
            ReplCommand::Stop => EventKind::Stop,
            ReplCommand::Text(text) => EventKind::Text(text),
        };

        spawn_dispatch(&mut tasks, &dispatcher, InboundEvent { owner, kind }, None);
    }

    // Let in-flight events finish before exiting
    while tasks.join_next().await.is_some() {}

    Ok(())
}
