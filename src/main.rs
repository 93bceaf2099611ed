use std::io::Write;

use color_eyre::Result;
use itertools::Itertools;
use termion::{clear, event::Key, raw::IntoRawMode};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::prelude::*;

use crate::{
    history::History,
    input::InputMessage,
    state::{Completion, Repl},
};

#[macro_use]
extern crate tracing;

pub mod builtins;
pub mod cmd;
pub mod complete;
pub mod env;
pub mod history;
pub mod input;
pub mod parse;
pub mod prelude;
pub mod process;
pub mod state;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(".", ".nush.log"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install()?;

    let history = History::new();
    if let Some(path) = env::histfile() {
        if let Err(err) = history.read_from(&path) {
            trace!("no history loaded from {}: {err}", path.display());
        }
    }

    if termion::is_tty(&std::io::stdin()) {
        interactive(&history).await?;
    } else {
        scripted(&history).await?;
    }

    history::flush(&history);
    Ok(())
}

/// The raw-mode editor loop: echoes keys, walks history, completes command
/// names, and hands finished lines to the executor with raw mode suspended.
async fn interactive(history: &History) -> Result<()> {
    let mut keys = input::spawn_input_thread();
    let mut repl = Repl::new(history.clone());
    let mut stdout = std::io::stdout().into_raw_mode()?;

    write!(stdout, "{}", repl.prompt)?;
    stdout.flush()?;

    while let Some(message) = keys.recv().await {
        match message {
            InputMessage::Key(key) => match key {
                Key::Char('\n') | Key::Char('\r') => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;

                    let line = repl.take_line();
                    stdout.suspend_raw_mode()?;
                    run_line(&line, history).await;
                    stdout.activate_raw_mode()?;

                    write!(stdout, "{}", repl.prompt)?;
                }
                Key::Char('\t') => match repl.complete() {
                    Completion::Extended => redraw(&mut stdout, &repl)?,
                    Completion::Options(options) => {
                        write!(stdout, "\r\n{}\r\n", options.iter().join("  "))?;
                        write!(stdout, "{}{}", repl.prompt, repl.buffer)?;
                    }
                    Completion::None => write!(stdout, "\x07")?,
                },
                Key::Char(c) => {
                    repl.insert(c);
                    write!(stdout, "{c}")?;
                }
                Key::Backspace => {
                    if repl.backspace() {
                        write!(stdout, "\u{8} \u{8}")?;
                    }
                }
                Key::Up => {
                    if repl.history_up() {
                        redraw(&mut stdout, &repl)?;
                    }
                }
                Key::Down => {
                    if repl.history_down() {
                        redraw(&mut stdout, &repl)?;
                    }
                }
                Key::Ctrl('c') => {
                    repl.take_line();
                    write!(stdout, "^C\r\n{}", repl.prompt)?;
                }
                Key::Ctrl('d') => {
                    if repl.buffer.is_empty() {
                        write!(stdout, "\r\n")?;
                        break;
                    }
                }
                _ => trace!("unhandled key: {:?}", key),
            },
            InputMessage::Error(err) => {
                error!("input error: {err}");
                break;
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

/// Plain line-at-a-time loop for non-terminal stdin.
async fn scripted(history: &History) -> Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("$ ");
        std::io::stdout().flush()?;

        match lines.next_line().await? {
            Some(line) => run_line(&line, history).await,
            None => break,
        }
    }
    Ok(())
}

/// Parses and executes one input line. The line lands in history before it
/// runs; diagnostics go to stdout and never unwind the REPL.
async fn run_line(line: &str, history: &History) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    history.add(line);

    match parse::parse_line(line) {
        Ok(plan) if plan.is_empty() => {}
        Ok(plan) => plan.run(history).await,
        Err(err) => println!("{err}"),
    }
}

fn redraw(out: &mut impl Write, repl: &Repl) -> std::io::Result<()> {
    write!(out, "\r{}{}{}", clear::CurrentLine, repl.prompt, repl.buffer)
}
