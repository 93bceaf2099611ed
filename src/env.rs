use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// Directories on the executable search path, in order. Empty segments in
/// `PATH` are ignored rather than treated as the current directory.
pub fn search_path() -> Vec<PathBuf> {
    split_search_path(&std::env::var("PATH").unwrap_or_default())
}

pub fn split_search_path(path: &str) -> Vec<PathBuf> {
    path.split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Finds `name` on the executable search path. The first directory holding
/// a regular file of that name with any execute bit set wins.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    find_in(&std::env::var("PATH").unwrap_or_default(), name)
}

pub fn find_in(path: &str, name: &str) -> Option<PathBuf> {
    split_search_path(path)
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// A regular file with any execute bit set (owner, group, or other).
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expands a leading `~` against the home directory. Returns `None` when
/// home is required but unset; a token in neither `~` nor `~/…` form passes
/// through untouched.
pub fn expand_tilde(target: &str) -> Option<PathBuf> {
    if target == "~" {
        home_dir()
    } else if let Some(rest) = target.strip_prefix("~/") {
        home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(target))
    }
}

/// The history file: `$HISTFILE` when set, else `$HOME/.nu_history`, else
/// nothing (history is session-only).
pub fn histfile() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("HISTFILE").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    home_dir().map(|home| home.join(".nu_history"))
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;

    fn touch(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn empty_segments_are_ignored() {
        assert_eq!(
            split_search_path("/bin::/usr/bin:"),
            vec![PathBuf::from("/bin"), PathBuf::from("/usr/bin")]
        );
        assert!(split_search_path("").is_empty());
    }

    #[test]
    fn find_in_requires_an_execute_bit() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "plain", 0o644);
        assert_eq!(find_in(&dir.path().to_string_lossy(), "plain"), None);

        let exe = touch(dir.path(), "tool", 0o755);
        assert_eq!(
            find_in(&dir.path().to_string_lossy(), "tool"),
            Some(exe)
        );
    }

    #[test]
    fn find_in_takes_the_first_match() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let winner = touch(first.path(), "dup", 0o700);
        touch(second.path(), "dup", 0o700);

        let path = format!(
            "{}:{}",
            first.path().to_string_lossy(),
            second.path().to_string_lossy()
        );
        assert_eq!(find_in(&path, "dup"), Some(winner));
    }

    #[test]
    fn directories_never_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        // Directories carry execute bits but are not regular files.
        assert_eq!(find_in(&dir.path().to_string_lossy(), "subdir"), None);
    }

    #[test]
    fn tilde_expansion_forms() {
        assert_eq!(
            expand_tilde("/absolute"),
            Some(PathBuf::from("/absolute"))
        );
        assert_eq!(expand_tilde("~user"), Some(PathBuf::from("~user")));
    }
}
