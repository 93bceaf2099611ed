use std::io;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{env, history::History, process::StageWrite};

use super::Builtin;

/// Changes the process-wide working directory; every later stage and child
/// process observes the move.
#[derive(Default)]
pub struct Cd;

#[async_trait]
impl Builtin for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    async fn run(
        &self,
        args: &[String],
        out: &mut StageWrite,
        _history: &History,
    ) -> io::Result<()> {
        let target = args.first();
        let path = match target {
            None => env::home_dir(),
            Some(token) => env::expand_tilde(token),
        };

        let Some(path) = path else {
            return out.write_all(b"cd: HOME not set\n").await;
        };

        if std::env::set_current_dir(&path).is_err() {
            let shown = match target {
                Some(token) => token.clone(),
                None => path.display().to_string(),
            };
            let message = format!("cd: {shown}: No such file or directory\n");
            return out.write_all(message.as_bytes()).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::run_capture;

    #[tokio::test]
    async fn failed_change_reports_the_typed_target() {
        let out = run_capture(&Cd, &["/definitely/not/a/directory"]).await;
        assert_eq!(
            out,
            "cd: /definitely/not/a/directory: No such file or directory\n"
        );
    }

    #[tokio::test]
    async fn failure_leaves_the_working_directory_alone() {
        let before = std::env::current_dir().unwrap();
        run_capture(&Cd, &["/definitely/not/a/directory"]).await;
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
