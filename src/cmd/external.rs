use std::{path::PathBuf, process::Stdio};

use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    process::Command,
    task::JoinHandle,
};

use crate::{
    env,
    process::{Stage, StageRead},
};

use super::execution_plan::{Redirect, RedirectMode, RedirectSource, StagePlan};

/// Resolves a command name to an executable: names containing `/` are
/// checked directly, everything else is searched on `PATH`.
pub fn resolve(name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return env::is_executable(&path).then_some(path);
    }
    env::find_on_path(name)
}

/// Spawns one external stage and wires its stdio for its pipeline role,
/// returning the stage handle and the byte source for the next stage.
///
/// The child is spawned by its typed name, so argv[0] is what the user
/// wrote rather than the resolved path.
pub async fn run(
    plan: StagePlan,
    input: Option<StageRead>,
    last: bool,
) -> (Stage, Option<StageRead>) {
    let Some(name) = plan.name().map(str::to_string) else {
        return settle(input, last);
    };

    if resolve(&name).is_none() {
        println!("{name}: command not found");
        return settle(input, last);
    }

    // Open the redirection sink up front; an unopenable or missing target
    // degrades the redirected descriptor to a null sink.
    let mut sink = None;
    if let Some(clause) = &plan.redirect {
        if let Some(target) = &clause.target {
            sink = open_sink(target, clause).await;
        }
    }
    let redirected = plan.redirect.as_ref().map(|clause| clause.source);

    let mut command = Command::new(&name);
    command.args(plan.args());
    command.stdin(match &input {
        Some(_) => Stdio::piped(),
        None => Stdio::inherit(),
    });

    // When a non-terminal stage diverts one of its output descriptors to a
    // file, the inter-stage channel carries the other one.
    let mut carry_from = None;
    match redirected {
        Some(RedirectSource::Stdout) => {
            command.stdout(if sink.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
            if last {
                command.stderr(Stdio::inherit());
            } else {
                command.stderr(Stdio::piped());
                carry_from = Some(RedirectSource::Stderr);
            }
        }
        Some(RedirectSource::Stderr) => {
            command.stderr(if sink.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
            if last {
                command.stdout(Stdio::inherit());
            } else {
                command.stdout(Stdio::piped());
                carry_from = Some(RedirectSource::Stdout);
            }
        }
        None => {
            command.stderr(Stdio::inherit());
            if last {
                command.stdout(Stdio::inherit());
            } else {
                command.stdout(Stdio::piped());
                carry_from = Some(RedirectSource::Stdout);
            }
        }
    }

    trace!("spawning external command: {:?}", command);
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            println!("Error: {err}");
            drop(sink);
            return settle(input, last);
        }
    };

    let mut io = Vec::new();

    if let Some(mut reader) = input {
        if let Some(mut stdin) = child.stdin.take() {
            io.push(tokio::spawn(async move {
                let _ = tokio::io::copy(&mut reader, &mut stdin).await;
                let _ = stdin.shutdown().await;
            }));
        }
    }

    if let Some(file) = sink {
        let captured: Option<StageRead> = match redirected {
            Some(RedirectSource::Stdout) => child.stdout.take().map(Into::into),
            Some(RedirectSource::Stderr) => child.stderr.take().map(Into::into),
            None => None,
        };
        if let Some(captured) = captured {
            io.push(copy_to_sink(captured, file));
        }
    }

    let carry = match carry_from {
        Some(RedirectSource::Stdout) => child.stdout.take().map(StageRead::Stdout),
        Some(RedirectSource::Stderr) => child.stderr.take().map(StageRead::Stderr),
        None => None,
    }
    .or_else(|| (!last).then_some(StageRead::Empty));

    (Stage::external(child, io), carry)
}

/// Opens a redirection target in the clause's mode.
pub(crate) async fn open_sink(target: &str, clause: &Redirect) -> Option<File> {
    // An fd-2 overwrite truncates the target even when the open below
    // fails; the later open surfaces the real error.
    if clause.source == RedirectSource::Stderr && clause.mode == RedirectMode::Overwrite {
        let _ = File::create(target).await;
    }

    let opened = match clause.mode {
        RedirectMode::Overwrite => File::create(target).await,
        RedirectMode::Append => {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(target)
                .await
        }
    };

    match opened {
        Ok(file) => Some(file),
        Err(err) => {
            warn!("cannot open redirection target {target}: {err}");
            None
        }
    }
}

fn copy_to_sink(mut captured: StageRead, mut file: File) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = tokio::io::copy(&mut captured, &mut file).await;
        let _ = file.flush().await;
    })
}

/// A stage that never spawned still drains its input so the upstream
/// writer can finish, and still hands the next stage an end-of-file.
fn settle(input: Option<StageRead>, last: bool) -> (Stage, Option<StageRead>) {
    let mut io = Vec::new();
    if let Some(input) = input {
        io.push(tokio::spawn(input.drain()));
    }
    (Stage::settled(io), (!last).then_some(StageRead::Empty))
}
