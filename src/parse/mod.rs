use thiserror::Error;

use crate::cmd::execution_plan::ExecutionPlan;

pub mod redirect;
pub mod token;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    /// A `|` sits where it would produce an empty stage: at the start or end
    /// of the line, or doubled.
    #[error("syntax error near unexpected token '|'")]
    UnexpectedPipe,
}

/// Parses one input line into an execution plan.
///
/// A blank line parses to an empty plan; a misplaced pipe is the only
/// syntax error this grammar can produce.
pub fn parse_line(line: &str) -> Result<ExecutionPlan, SyntaxError> {
    let tokens = token::tokenize(line);
    let stages = split_stages(tokens)?;

    let plan = ExecutionPlan {
        stages: stages.into_iter().map(redirect::extract).collect(),
    };
    trace!("parsed plan: {:?}", plan);

    Ok(plan)
}

fn split_stages(tokens: Vec<String>) -> Result<Vec<Vec<String>>, SyntaxError> {
    let mut stages = Vec::new();
    let mut current = Vec::new();
    let mut piped = false;

    for token in tokens {
        if token == "|" {
            if current.is_empty() {
                return Err(SyntaxError::UnexpectedPipe);
            }
            stages.push(std::mem::take(&mut current));
            piped = true;
        } else {
            current.push(token);
        }
    }

    if current.is_empty() {
        if piped {
            return Err(SyntaxError::UnexpectedPipe);
        }
    } else {
        stages.push(current);
    }

    Ok(stages)
}
