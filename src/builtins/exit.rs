use std::io;

use async_trait::async_trait;

use crate::{history::History, process::StageWrite};

use super::Builtin;

/// Shell-lifecycle command: flushes unsaved history to the history file and
/// terminates the process with status 0 instead of completing as a stage.
#[derive(Default)]
pub struct Exit;

#[async_trait]
impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    async fn run(
        &self,
        _args: &[String],
        _out: &mut StageWrite,
        history: &History,
    ) -> io::Result<()> {
        crate::history::flush(history);
        std::process::exit(0);
    }
}
