use tokio::{process::Child, task::JoinHandle};

pub mod read;
pub mod write;

pub use read::StageRead;
pub use write::StageWrite;

/// Capacity of the in-memory byte channel wired between pipeline stages.
pub const PIPE_CAPACITY: usize = 64 * 1024;

/// A running pipeline stage and everything that must reach a terminal state
/// before the stage counts as finished: the stage body itself plus any
/// stream-plumbing tasks (stdin feeds, redirection sinks).
pub struct Stage {
    child: StageChild,
    io: Vec<JoinHandle<()>>,
}

/// The stage body's one-shot terminal signal.
enum StageChild {
    /// A spawned external program; the signal is its exit event.
    Process(Child),
    /// An in-process builtin running as a task.
    Task(JoinHandle<()>),
    /// A stage that never started (unknown command, spawn failure) or had
    /// nothing to run; already terminal.
    Settled,
}

impl Stage {
    pub fn external(child: Child, io: Vec<JoinHandle<()>>) -> Self {
        Self {
            child: StageChild::Process(child),
            io,
        }
    }

    pub fn builtin(task: JoinHandle<()>) -> Self {
        Self {
            child: StageChild::Task(task),
            io: Vec::new(),
        }
    }

    pub fn settled(io: Vec<JoinHandle<()>>) -> Self {
        Self {
            child: StageChild::Settled,
            io,
        }
    }

    /// Waits for the stage and all of its plumbing to finish. Exit statuses
    /// are not surfaced; an error from any participant counts as that
    /// participant's completion.
    pub async fn wait(self) {
        match self.child {
            StageChild::Process(mut child) => {
                let _ = child.wait().await;
            }
            StageChild::Task(task) => {
                let _ = task.await;
            }
            StageChild::Settled => {}
        }

        for task in self.io {
            let _ = task.await;
        }
    }
}
