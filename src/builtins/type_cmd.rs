use std::io;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{env, history::History, process::StageWrite};

use super::{Builtin, Builtins};

#[derive(Default)]
pub struct Type;

#[async_trait]
impl Builtin for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    async fn run(
        &self,
        args: &[String],
        out: &mut StageWrite,
        _history: &History,
    ) -> io::Result<()> {
        // Builtins shadow search-path executables of the same name.
        let message = match args.first() {
            None => "type: missing argument\n".to_string(),
            Some(name) if Builtins::is_builtin(name) => {
                format!("{name} is a shell builtin\n")
            }
            Some(name) => match env::find_on_path(name) {
                Some(path) => format!("{name} is {}\n", path.display()),
                None => format!("{name}: not found\n"),
            },
        };
        out.write_all(message.as_bytes()).await
    }
}
