use tokio::io::AsyncWriteExt;

use crate::{
    builtins::{Builtin, Builtins},
    history::History,
    process::{Stage, StageRead, StageWrite, PIPE_CAPACITY},
};

use super::{
    execution_plan::{ExecutionPlan, RedirectSource, StagePlan},
    external,
};

impl ExecutionPlan {
    /// Runs the pipeline: wires every stage to the next, lets them proceed
    /// in parallel, and returns only after each stage and each file sink
    /// has reached a terminal state.
    pub async fn run(self, history: &History) {
        let count = self.stages.len();
        let mut carry: Option<StageRead> = None;
        let mut running = Vec::with_capacity(count);

        for (index, plan) in self.stages.into_iter().enumerate() {
            let last = index + 1 == count;
            let (stage, next) = dispatch(plan, carry.take(), last, history).await;
            carry = next;
            running.push(stage);
        }

        for stage in running {
            stage.wait().await;
        }
    }
}

/// Routes a stage to the in-process runner when its head token names a
/// builtin, otherwise to the external runner.
async fn dispatch(
    plan: StagePlan,
    input: Option<StageRead>,
    last: bool,
    history: &History,
) -> (Stage, Option<StageRead>) {
    match plan.name().and_then(Builtins::from_name) {
        Some(cmd) => builtin_stage(cmd, plan, input, last, history.clone()).await,
        None if plan.name().is_some() => external::run(plan, input, last).await,
        None => {
            // The stage was nothing but a redirection clause; there is no
            // command to run and no file is opened.
            let mut io = Vec::new();
            if let Some(input) = input {
                io.push(tokio::spawn(input.drain()));
            }
            (Stage::settled(io), (!last).then_some(StageRead::Empty))
        }
    }
}

async fn builtin_stage(
    cmd: Builtins,
    plan: StagePlan,
    input: Option<StageRead>,
    last: bool,
    history: History,
) -> (Stage, Option<StageRead>) {
    let (mut out, carry) = builtin_output(&plan, last).await;
    let args = plan.args().to_vec();

    let task = tokio::spawn(async move {
        // The drain obligation lives here, not in the commands: none of
        // them reads input, but the upstream stage must be able to finish
        // flushing and close its end.
        let drain = async {
            if let Some(input) = input {
                input.drain().await;
            }
        };
        let work = async {
            if let Err(err) = cmd.run(&args, &mut out, &history).await {
                warn!("builtin output error: {err}");
            }
            let _ = out.shutdown().await;
        };
        tokio::join!(drain, work);
    });

    (Stage::builtin(task), carry)
}

/// Picks the builtin's output sink for its role and redirection clause,
/// along with the byte source handed to the next stage.
async fn builtin_output(plan: &StagePlan, last: bool) -> (StageWrite, Option<StageRead>) {
    match &plan.redirect {
        Some(clause) if clause.source == RedirectSource::Stdout => {
            let out = match &clause.target {
                Some(target) => match external::open_sink(target, clause).await {
                    Some(file) => StageWrite::File(file),
                    None => StageWrite::sink(),
                },
                None => StageWrite::sink(),
            };
            // Output is diverted to the file; a downstream stage sees
            // immediate end-of-file.
            (out, (!last).then_some(StageRead::Empty))
        }
        Some(clause) => {
            // Builtins have no stderr stream, but the clause still creates
            // or truncates its target.
            if let Some(target) = &clause.target {
                let _ = external::open_sink(target, clause).await;
            }
            plain_output(last)
        }
        None => plain_output(last),
    }
}

fn plain_output(last: bool) -> (StageWrite, Option<StageRead>) {
    if last {
        (StageWrite::stdout(), None)
    } else {
        let (tx, rx) = tokio::io::duplex(PIPE_CAPACITY);
        (StageWrite::Duplex(tx), Some(StageRead::Duplex(rx)))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::parse::parse_line;

    async fn run_plan(line: &str, history: &History) {
        parse_line(line).expect("parse").run(history).await;
    }

    #[tokio::test]
    async fn builtin_redirects_stdout_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        let line = format!("echo foo > {}", file.display());

        run_plan(&line, &History::new()).await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "foo\n");
    }

    #[tokio::test]
    async fn append_mode_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        let history = History::new();

        run_plan(&format!("echo one >> {}", file.display()), &history).await;
        run_plan(&format!("echo two >> {}", file.display()), &history).await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn overwrite_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        let history = History::new();

        run_plan(&format!("echo first > {}", file.display()), &history).await;
        run_plan(&format!("echo second > {}", file.display()), &history).await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "second\n");
    }

    #[tokio::test]
    async fn stderr_redirect_leaves_builtin_output_on_stdout_and_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("err");

        run_plan(&format!("echo hi 2> {}", file.display()), &History::new()).await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "");
    }

    #[tokio::test]
    async fn missing_redirect_target_opens_no_file_and_still_completes() {
        run_plan("echo hi >", &History::new()).await;
    }

    #[tokio::test]
    async fn pipeline_of_builtins_drains_and_completes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");

        run_plan(
            &format!("echo upstream | echo downstream > {}", file.display()),
            &History::new(),
        )
        .await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "downstream\n");
    }

    #[tokio::test]
    async fn unknown_command_settles_without_blocking_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");

        run_plan(
            &format!("no-such-cmd-anywhere | echo ok > {}", file.display()),
            &History::new(),
        )
        .await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "ok\n");
    }

    #[tokio::test]
    async fn builtin_feeds_an_external_stage() {
        if external::resolve("cat").is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");

        run_plan(
            &format!("echo through the pipe | cat > {}", file.display()),
            &History::new(),
        )
        .await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "through the pipe\n");
    }

    #[tokio::test]
    async fn external_stderr_redirects_to_a_file() {
        if external::resolve("cat").is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("err");

        run_plan(
            &format!("cat /definitely/missing/input 2> {}", file.display()),
            &History::new(),
        )
        .await;

        assert!(!fs::read_to_string(&file).unwrap().is_empty());
    }

    #[tokio::test]
    async fn three_stage_pipeline_through_externals() {
        if external::resolve("cat").is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");

        run_plan(
            &format!("echo chained | cat | cat > {}", file.display()),
            &History::new(),
        )
        .await;

        assert_eq!(fs::read_to_string(&file).unwrap(), "chained\n");
    }

    #[tokio::test]
    async fn history_observes_its_own_invocation_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        let history = History::new();
        history.add("echo first");
        history.add("history");

        run_plan(&format!("history > {}", file.display()), &history).await;

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "    1  echo first\n    2  history\n"
        );
    }
}
