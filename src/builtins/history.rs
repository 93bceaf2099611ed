use std::{io, path::Path};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{history::History, process::StageWrite};

use super::Builtin;

/// `history [N | -r F | -w F | -a F]`
///
/// Listing shows 1-based indices that are never renumbered within a run;
/// `-r` replaces the in-memory list; `-w` and `-a` persist it, tracking the
/// last-saved marker so appends stay incremental.
#[derive(Default)]
pub struct HistoryCmd;

#[async_trait]
impl Builtin for HistoryCmd {
    fn name(&self) -> &'static str {
        "history"
    }

    async fn run(
        &self,
        args: &[String],
        out: &mut StageWrite,
        history: &History,
    ) -> io::Result<()> {
        let text = match args.first().map(String::as_str) {
            None => render(&history.entries(), 0),
            Some(flag @ ("-r" | "-w" | "-a")) => match args.get(1) {
                None => format!("history: {flag}: option requires an argument\n"),
                Some(file) => transfer(history, flag, file),
            },
            Some(count) => match count.parse::<usize>() {
                Ok(n) => {
                    let entries = history.entries();
                    let skip = entries.len().saturating_sub(n);
                    render(&entries, skip)
                }
                Err(_) => format!("history: {count}: numeric argument required\n"),
            },
        };
        out.write_all(text.as_bytes()).await
    }
}

fn render(entries: &[String], skip: usize) -> String {
    entries
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(index, entry)| format!("    {}  {entry}\n", index + 1))
        .collect()
}

fn transfer(history: &History, flag: &str, file: &str) -> String {
    let path = Path::new(file);
    let result = match flag {
        "-r" => history.read_from(path),
        "-w" => history.write_to(path),
        _ => history.append_to(path),
    };

    match result {
        Ok(()) => String::new(),
        Err(_) if flag == "-r" => format!("history: {file}: No such file or directory\n"),
        Err(_) => format!("history: {file}: cannot write to file\n"),
    }
}
