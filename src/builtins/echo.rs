use std::io;

use async_trait::async_trait;
use itertools::Itertools;
use tokio::io::AsyncWriteExt;

use crate::{history::History, process::StageWrite};

use super::Builtin;

#[derive(Default)]
pub struct Echo;

#[async_trait]
impl Builtin for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn run(
        &self,
        args: &[String],
        out: &mut StageWrite,
        _history: &History,
    ) -> io::Result<()> {
        let line = format!("{}\n", args.iter().join(" "));
        out.write_all(line.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::run_capture;

    #[tokio::test]
    async fn joins_args_with_single_spaces() {
        let out = run_capture(&Echo, &["hello", "world"]).await;
        assert_eq!(out, "hello world\n");
    }

    #[tokio::test]
    async fn preserves_whitespace_inside_arguments() {
        let out = run_capture(&Echo, &["hello  world"]).await;
        assert_eq!(out, "hello  world\n");
    }

    #[tokio::test]
    async fn bare_echo_emits_a_newline() {
        let out = run_capture(&Echo, &[]).await;
        assert_eq!(out, "\n");
    }
}
