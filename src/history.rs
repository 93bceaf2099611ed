use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

/// The session's command history: a shared, growable list of entries plus
/// the last-saved marker recording how many of them have been persisted.
///
/// The handle is cheap to clone; every stage of a pipeline sees the same
/// store. Entries are indexed 1-based for display and never renumbered
/// within a run.
#[derive(Clone, Default)]
pub struct History {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    entries: Vec<String>,
    saved: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records an entered line. Called before the line executes, so a
    /// `history` command observes its own invocation.
    pub fn add(&self, entry: &str) {
        self.store().entries.push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.store().entries.clone()
    }

    /// Replaces the in-memory history with the lines of `path`, discarding
    /// empty lines. The last-saved marker moves past the loaded entries so
    /// a later append does not re-emit them.
    pub fn read_from(&self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        let mut store = self.store();
        store.entries = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        store.saved = store.entries.len();
        Ok(())
    }

    /// Writes the full history to `path`, overwriting, and advances the
    /// last-saved marker.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut store = self.store();
        let mut text = store.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(path, text)?;
        store.saved = store.entries.len();
        Ok(())
    }

    /// Appends entries past the last-saved marker to `path` and advances
    /// the marker. A no-op when nothing new exists.
    pub fn append_to(&self, path: &Path) -> io::Result<()> {
        let mut store = self.store();
        if store.saved == store.entries.len() {
            return Ok(());
        }

        let mut file = fs::OpenOptions::new().append(true).create(true).open(path)?;
        for entry in &store.entries[store.saved..] {
            writeln!(file, "{entry}")?;
        }
        store.saved = store.entries.len();
        Ok(())
    }
}

/// Shutdown flush: append any unsaved entries to the history file.
/// Failures here are deliberately ignored.
pub fn flush(history: &History) {
    if let Some(path) = crate::env::histfile() {
        if let Err(err) = history.append_to(&path) {
            warn!("failed to append history to {}: {err}", path.display());
        }
    }
}
