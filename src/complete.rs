use std::collections::BTreeSet;

use crate::{builtins::BUILTIN_NAMES, env};

/// Command names matching `prefix`: builtins merged with the executables on
/// the search path, sorted and deduplicated.
pub fn candidates(prefix: &str) -> Vec<String> {
    let mut matches = BTreeSet::new();

    for name in BUILTIN_NAMES.iter() {
        if name.starts_with(prefix) {
            matches.insert(name.to_string());
        }
    }

    for dir in env::search_path() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) && env::is_executable(&entry.path()) {
                matches.insert(name);
            }
        }
    }

    matches.into_iter().collect()
}

pub fn longest_common_prefix(words: &[String]) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };

    let mut prefix = first.clone();
    for word in &words[1..] {
        let common = prefix
            .chars()
            .zip(word.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let bytes = prefix.chars().take(common).map(char::len_utf8).sum();
        prefix.truncate(bytes);
    }
    prefix
}
