use crate::{complete, history::History};

/// Editing state for one interactive line: the buffer being typed, the
/// history-navigation cursor, and the live line stashed while navigating.
pub struct Repl {
    pub prompt: &'static str,
    pub buffer: String,
    stash: String,
    nav: Option<usize>,
    history: History,
}

/// What a Tab press did to the buffer.
pub enum Completion {
    /// No candidates, or nothing sensible to complete; ring the bell.
    None,
    /// The buffer was extended in place; redraw the line.
    Extended,
    /// Several candidates remain beyond the common prefix; list them and
    /// redraw.
    Options(Vec<String>),
}

impl Repl {
    pub fn new(history: History) -> Self {
        Self {
            prompt: "$ ",
            buffer: String::new(),
            stash: String::new(),
            nav: None,
            history,
        }
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    /// Takes the finished line and resets the editing state.
    pub fn take_line(&mut self) -> String {
        self.nav = None;
        self.stash.clear();
        std::mem::take(&mut self.buffer)
    }

    pub fn history_up(&mut self) -> bool {
        let entries = self.history.entries();
        let next = match self.nav {
            None if entries.is_empty() => return false,
            None => {
                self.stash = std::mem::take(&mut self.buffer);
                0
            }
            Some(pos) if pos + 1 < entries.len() => pos + 1,
            Some(_) => return false,
        };

        self.nav = Some(next);
        self.buffer = entries[entries.len() - 1 - next].clone();
        true
    }

    pub fn history_down(&mut self) -> bool {
        match self.nav {
            None => false,
            Some(0) => {
                self.nav = None;
                self.buffer = std::mem::take(&mut self.stash);
                true
            }
            Some(pos) => {
                let entries = self.history.entries();
                self.nav = Some(pos - 1);
                self.buffer = entries[entries.len() - pos].clone();
                true
            }
        }
    }

    /// Completes the command word against the catalog. Only the first word
    /// completes; once the buffer holds whitespace, Tab just rings.
    pub fn complete(&mut self) -> Completion {
        if self.buffer.is_empty() || self.buffer.contains(char::is_whitespace) {
            return Completion::None;
        }

        let matches = complete::candidates(&self.buffer);
        match matches.as_slice() {
            [] => Completion::None,
            [only] => {
                self.buffer = format!("{only} ");
                Completion::Extended
            }
            _ => {
                let prefix = complete::longest_common_prefix(&matches);
                if prefix.len() > self.buffer.len() {
                    self.buffer = prefix;
                    Completion::Extended
                } else {
                    Completion::Options(matches)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl_with(entries: &[&str]) -> Repl {
        let history = History::new();
        for entry in entries {
            history.add(entry);
        }
        Repl::new(history)
    }

    #[test]
    fn up_walks_from_newest_to_oldest() {
        let mut repl = repl_with(&["first", "second"]);

        assert!(repl.history_up());
        assert_eq!(repl.buffer, "second");
        assert!(repl.history_up());
        assert_eq!(repl.buffer, "first");
        assert!(!repl.history_up(), "stops at the oldest entry");
        assert_eq!(repl.buffer, "first");
    }

    #[test]
    fn down_restores_the_stashed_live_line() {
        let mut repl = repl_with(&["older"]);
        repl.insert('x');
        repl.insert('y');

        assert!(repl.history_up());
        assert_eq!(repl.buffer, "older");
        assert!(repl.history_down());
        assert_eq!(repl.buffer, "xy");
        assert!(!repl.history_down());
    }

    #[test]
    fn up_on_empty_history_is_a_no_op() {
        let mut repl = repl_with(&[]);
        assert!(!repl.history_up());
        assert!(!repl.history_down());
    }

    #[test]
    fn take_line_resets_navigation() {
        let mut repl = repl_with(&["cmd"]);
        repl.history_up();
        assert_eq!(repl.take_line(), "cmd");
        assert!(repl.buffer.is_empty());
        assert!(!repl.history_down());
    }

    #[test]
    fn completion_ignores_lines_past_the_command_word() {
        let mut repl = repl_with(&[]);
        repl.buffer = "echo arg".to_string();
        assert!(matches!(repl.complete(), Completion::None));
        repl.buffer.clear();
        assert!(matches!(repl.complete(), Completion::None));
    }
}
