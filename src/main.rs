//! Binary entrypoint for the Lamplighter CLI.
//!
//! Commands:
//! - `play [--slot <n> | --continue] [--difficulty <level>]` - start or resume a run
//! - `init` - create a starter `config.toml` and the data directory
//! - `saves` - list occupied save slots
//!
//! See the library crate docs for module-level details: `lamplighter::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use lamplighter::cathedral::render::render_view;
use lamplighter::cathedral::{
    parse_movement, Difficulty, FileSaveStore, Mode, MoveOutcome, Request, SaveSlot, SaveStore,
    Session,
};
use lamplighter::config::Config;

#[derive(Parser)]
#[command(name = "lamplighter")]
#[command(about = "Explore the Sunken Cathedral by lantern light")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging to stderr (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new run, or resume one
    Play {
        /// Resume from a manual save slot
        #[arg(short, long, conflicts_with = "resume")]
        slot: Option<u8>,

        /// Resume from the autosave
        #[arg(long = "continue")]
        resume: bool,

        /// explorer, story, easy, or hard (overrides the config file)
        #[arg(short, long)]
        difficulty: Option<String>,
    },
    /// Write a default configuration file
    Init,
    /// List saved games
    Saves,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(None, cli.verbose);
            if Path::new(&cli.config).exists() {
                println!("{} already exists; leaving it untouched.", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            let config = Config::default();
            tokio::fs::create_dir_all(&config.storage.data_dir).await?;
            println!("Wrote {}", cli.config);
            println!("Saves will be kept in {}/saves", config.storage.data_dir);
        }
        Commands::Saves => {
            let config = Config::load_or_default(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let store = config.storage.save_store();
            let slots = store.list()?;
            if slots.is_empty() {
                println!(
                    "No saved games in {} (autosave plus slots 1-{})",
                    store.dir().display(),
                    store.max_slots()
                );
            }
            for info in slots {
                println!("{}", info);
            }
        }
        Commands::Play {
            slot,
            resume,
            difficulty,
        } => {
            let mut config = Config::load_or_default(&cli.config).await?;
            if let Some(level) = difficulty {
                config.game.difficulty = Difficulty::parse(&level).ok_or_else(|| {
                    anyhow!(
                        "unknown difficulty '{}': choose explorer, story, easy, or hard",
                        level
                    )
                })?;
            }
            init_logging(Some(&config), cli.verbose);

            let store = config.storage.save_store();
            let options = config.game.session_options();
            let session = match (slot, resume) {
                (Some(n), _) => Session::from_save(store.load(SaveSlot::Manual(n))?, options)?,
                (None, true) => Session::from_save(store.load(SaveSlot::Autosave)?, options)?,
                (None, false) => Session::new(options),
            };
            info!(
                "starting Lamplighter v{} on {}",
                env!("CARGO_PKG_VERSION"),
                session.options.difficulty.label()
            );
            run_game(session, &config, &store).await?;
        }
    }

    Ok(())
}

async fn run_game(mut session: Session, config: &Config, store: &FileSaveStore) -> Result<()> {
    println!("{}\n", session.arrival_text());
    println!("{}", render_view(&session));
    println!("Type HELP (or / then HELP) for commands.");
    prompt(&session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Flow::Quit = handle_line(&mut session, line.trim(), config, store) {
            break;
        }
        prompt(&session)?;
    }
    autosave(&session, config, store);
    Ok(())
}

fn prompt(session: &Session) -> std::io::Result<()> {
    let marker = match session.mode() {
        Mode::AwaitingCommand => "> ",
        Mode::Exploring => ": ",
    };
    let mut out = std::io::stdout();
    write!(out, "{}", marker)?;
    out.flush()
}

/// Exploring: direction runs are ticks, `/` pauses for a command, anything
/// else is taken as a command typed in one go.
fn handle_line(session: &mut Session, line: &str, config: &Config, store: &FileSaveStore) -> Flow {
    if session.mode() == Mode::AwaitingCommand {
        return submit(session, line, config, store);
    }
    if line.is_empty() {
        println!("{}", render_view(session));
        return Flow::Continue;
    }
    if line == "/" {
        session.begin_command();
        return Flow::Continue;
    }
    if let Some(steps) = parse_movement(line) {
        for dir in steps {
            let outcome = session.step(dir);
            if let Some(message) = outcome.message() {
                println!("{}", message);
            }
            if matches!(outcome, MoveOutcome::Blocked(_) | MoveOutcome::Blackout(_)) {
                break;
            }
        }
        autosave(session, config, store);
        println!("{}", render_view(session));
        return Flow::Continue;
    }
    session.begin_command();
    submit(session, line.trim_start_matches('/'), config, store)
}

fn submit(session: &mut Session, line: &str, config: &Config, store: &FileSaveStore) -> Flow {
    let outcome = match session.submit_command(line) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            println!("(cancelled)");
            return Flow::Continue;
        }
        Err(e) => {
            println!("{}", e);
            return Flow::Continue;
        }
    };
    println!("{}", outcome.message);

    match outcome.request {
        None => {
            autosave(session, config, store);
            println!("{}", render_view(session));
        }
        Some(Request::Save(n)) => {
            let slot = SaveSlot::Manual(n.unwrap_or(1));
            match store.save(slot, &session.snapshot()) {
                Ok(()) => println!("Saved to {}.", slot),
                Err(e) => println!("Save failed: {}", e),
            }
        }
        Some(Request::Load(n)) => {
            let slot = n.map_or(SaveSlot::Autosave, SaveSlot::Manual);
            let loaded = store
                .load(slot)
                .and_then(|data| Session::from_save(data, config.game.session_options()));
            match loaded {
                Ok(restored) => {
                    *session = restored;
                    println!("Loaded {}.", slot);
                    println!("{}", session.arrival_text());
                    println!("{}", render_view(session));
                }
                Err(e) => println!("Load failed: {}", e),
            }
        }
        Some(Request::Quit) => return Flow::Quit,
    }
    Flow::Continue
}

fn autosave(session: &Session, config: &Config, store: &FileSaveStore) {
    if !config.game.autosave {
        return;
    }
    if let Err(e) = store.save(SaveSlot::Autosave, &session.snapshot()) {
        warn!("autosave failed: {}", e);
    }
}

/// File logging per config; stderr only with `-v`, or for piped runs with no
/// log file, so log lines never land on the game screen.
fn init_logging(config: Option<&Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
    let interactive = atty::is(atty::Stream::Stdout);
    let to_console = verbosity > 0 || (log_file.is_none() && !interactive);

    if let Some(f) = log_file {
        let file = std::sync::Mutex::new(f);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if to_console {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else if to_console {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    } else {
        builder.filter_level(log::LevelFilter::Off);
    }
    let _ = builder.try_init();
}
