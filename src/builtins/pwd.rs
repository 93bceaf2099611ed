use std::io;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{history::History, process::StageWrite};

use super::Builtin;

#[derive(Default)]
pub struct Pwd;

#[async_trait]
impl Builtin for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    async fn run(
        &self,
        _args: &[String],
        out: &mut StageWrite,
        _history: &History,
    ) -> io::Result<()> {
        let cwd = std::env::current_dir()?;
        out.write_all(format!("{}\n", cwd.display()).as_bytes()).await
    }
}
