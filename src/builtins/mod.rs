use std::io;

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};

use crate::{history::History, process::StageWrite};

pub mod cd;
pub mod echo;
pub mod exit;
pub mod history;
pub mod pwd;
pub mod type_cmd;

/// A command executed inside the shell process.
///
/// Builtins never read their input stream; the stage runner owns the drain
/// obligation for pipeline input, and closes `out` after `run` returns.
/// Diagnostics go to `out` as well, and a finished `run` always counts as
/// normal stage completion.
#[async_trait]
#[enum_dispatch(Builtins)]
pub trait Builtin {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        args: &[String],
        out: &mut StageWrite,
        history: &History,
    ) -> io::Result<()>;
}

#[enum_dispatch]
#[derive(EnumIter)]
pub enum Builtins {
    Echo(echo::Echo),
    Pwd(pwd::Pwd),
    Cd(cd::Cd),
    Type(type_cmd::Type),
    History(history::HistoryCmd),
    Exit(exit::Exit),
}

pub static BUILTIN_NAMES: Lazy<Vec<&'static str>> =
    Lazy::new(|| Builtins::iter().map(|cmd| cmd.name()).collect());

impl Builtins {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|cmd| cmd.name() == name)
    }

    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_NAMES.contains(&name)
    }
}

/// Test support: runs a builtin against a fresh history, capturing what it
/// writes to its output stream.
#[cfg(test)]
pub(crate) async fn run_capture<B: Builtin>(cmd: &B, args: &[&str]) -> String {
    run_capture_with(cmd, args, &History::new()).await
}

#[cfg(test)]
pub(crate) async fn run_capture_with<B: Builtin>(
    cmd: &B,
    args: &[&str],
    history: &History,
) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let (tx, mut rx) = tokio::io::duplex(crate::process::PIPE_CAPACITY);
    let mut out = StageWrite::Duplex(tx);
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();

    cmd.run(&args, &mut out, history).await.expect("builtin run");
    out.shutdown().await.expect("close builtin output");
    drop(out);

    let mut captured = String::new();
    rx.read_to_string(&mut captured).await.expect("read output");
    captured
}
