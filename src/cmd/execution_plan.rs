/// One parsed input line: an ordered chain of stages connected by `|`.
///
/// An empty plan (blank line) executes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionPlan {
    pub stages: Vec<StagePlan>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// One command within a pipeline: its argv and an optional redirection
/// clause, with quoting already resolved by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    pub argv: Vec<String>,
    pub redirect: Option<Redirect>,
}

impl StagePlan {
    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        if self.argv.is_empty() {
            &[]
        } else {
            &self.argv[1..]
        }
    }
}

/// A redirection clause: which descriptor is diverted, how the target is
/// opened, and the target path. A missing target means the clause was cut
/// short at end of line; no file is opened for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub source: RedirectSource,
    pub mode: RedirectMode,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectSource {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Overwrite,
    Append,
}
