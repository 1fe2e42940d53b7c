//! Command-line front end and entry point.
//!
//! A line-oriented shell over the library: each input line is parsed into an
//! [`Event`], dispatched (running any fetch it triggers), and the resulting
//! snapshot is rendered to stdout. Logs go to the data directory, never to the
//! terminal.
//!
//! # Lifecycle
//!
//! 1. **Load**: Read config (file argument, then `GIFSEEK_*` overrides), validate
//! 2. **Init**: Start tracing, open storage, build the fetch worker
//! 3. **Loop**: Read a command, dispatch, render
//!
//! # Commands
//!
//! - `search <query>` or `/<query>`: Start a new search
//! - `quick`: Run the configured quick search
//! - `more`: Load the next page
//! - `sort recent|relevance`: Change the ordering
//! - `fav <n>`: Toggle favorite on tile `n`
//! - `key [value]`: Save the API key override (no value clears it)
//! - `session-key <value>`: Use an API key for this run only
//! - `home`: Reset to the idle view
//! - `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use gifseek::domain::FavoriteEntry;
use gifseek::worker::SearchWorker;
use gifseek::{dispatch, Action, Config, Event, RenderSnapshot, SortMode};

const HELP: &str = "\
commands:
  search <query>        start a new search (or /<query>)
  quick                 run the quick search
  more                  load the next page
  sort recent|relevance change the ordering
  fav <n>               toggle favorite on tile n
  key [value]           save the API key override (no value clears it)
  session-key <value>   use an API key for this run only
  home                  back to the start
  help                  show this help
  quit                  exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Dispatch(Event),
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str, snapshot: &RenderSnapshot) -> Command {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Command::Dispatch(Event::StartNewSearch(query.to_string()));
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "" | "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "search" | "s" => Command::Dispatch(Event::StartNewSearch(rest.to_string())),
        "quick" => Command::Dispatch(Event::QuickSearch),
        "more" | "m" => Command::Dispatch(Event::LoadMore),
        "home" | "reset" => Command::Dispatch(Event::Reset),
        "sort" => SortMode::parse(rest).map_or_else(
            || Command::Invalid(format!("unknown sort {rest:?}, expected recent or relevance")),
            |mode| Command::Dispatch(Event::SetSort(mode)),
        ),
        "fav" | "f" => favorite_for(rest, snapshot).map_or_else(
            || Command::Invalid(format!("no tile {rest:?} to favorite")),
            |entry| Command::Dispatch(Event::ToggleFavorite(entry)),
        ),
        "key" => Command::Dispatch(Event::SetCredentialOverride(rest.to_string())),
        "session-key" => Command::Dispatch(Event::SetSessionCredential(rest.to_string())),
        other => Command::Invalid(format!("unknown command {other:?}, type help")),
    }
}

fn favorite_for(arg: &str, snapshot: &RenderSnapshot) -> Option<FavoriteEntry> {
    let index: usize = arg.parse().ok()?;
    snapshot
        .items
        .get(index.checked_sub(1)?)
        .and_then(gifseek::ui::DisplayItem::favorite_entry)
}

fn load_config() -> gifseek::Result<Config> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::from_file(&PathBuf::from(path))?,
        None => Config::default(),
    };
    let config = config.merge_env();
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gifseek: {e}");
            return ExitCode::FAILURE;
        }
    };

    gifseek::observability::init_tracing(&config);
    tracing::info!(endpoint = %config.endpoint, limit = config.limit, "starting gifseek");

    let worker = match SearchWorker::from_config(&config) {
        Ok(worker) => worker,
        Err(e) => {
            eprintln!("gifseek: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = gifseek::initialize(&config);
    gifseek::ui::render(&state);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                eprintln!("gifseek: {e}");
                return ExitCode::FAILURE;
            }
        };

        let event = match parse_command(&line, &state.compute_snapshot()) {
            Command::Dispatch(event) => event,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
            Command::Invalid(message) => {
                println!("{message}");
                continue;
            }
        };

        match dispatch(&mut state, &worker, event).await {
            Ok((needs_render, actions)) => {
                if needs_render {
                    gifseek::ui::render(&state);
                }
                for action in actions {
                    if action == Action::PromptCredential {
                        println!("Set an API key with: key <value>  (or session-key <value>)");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "command failed");
                println!("error: {e}");
            }
        }
    }

    tracing::info!("gifseek exiting");
    ExitCode::SUCCESS
}
