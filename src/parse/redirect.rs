use crate::cmd::execution_plan::{Redirect, RedirectMode, RedirectSource, StagePlan};

/// Separates a stage's trailing redirection clause from its command tokens.
///
/// The scan stops at the first operator; the single token after it (two
/// tokens after, for the split `1 >` / `2 >>` forms) is the target, and
/// anything past the target is dropped.
pub fn extract(tokens: Vec<String>) -> StagePlan {
    for (i, token) in tokens.iter().enumerate() {
        if let Some((source, mode)) = combined_operator(token) {
            return StagePlan {
                redirect: Some(Redirect {
                    source,
                    mode,
                    target: tokens.get(i + 1).cloned(),
                }),
                argv: tokens[..i].to_vec(),
            };
        }

        let source = match token.as_str() {
            "1" => RedirectSource::Stdout,
            "2" => RedirectSource::Stderr,
            _ => continue,
        };
        // A bare `1` or `2` is an operator only when `>` or `>>` follows
        // immediately; otherwise it is an ordinary word.
        if let Some(mode) = tokens.get(i + 1).and_then(|next| bare_operator(next)) {
            return StagePlan {
                redirect: Some(Redirect {
                    source,
                    mode,
                    target: tokens.get(i + 2).cloned(),
                }),
                argv: tokens[..i].to_vec(),
            };
        }
    }

    StagePlan {
        argv: tokens,
        redirect: None,
    }
}

fn combined_operator(token: &str) -> Option<(RedirectSource, RedirectMode)> {
    match token {
        ">" | "1>" => Some((RedirectSource::Stdout, RedirectMode::Overwrite)),
        ">>" | "1>>" => Some((RedirectSource::Stdout, RedirectMode::Append)),
        "2>" => Some((RedirectSource::Stderr, RedirectMode::Overwrite)),
        "2>>" => Some((RedirectSource::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

fn bare_operator(token: &str) -> Option<RedirectMode> {
    match token {
        ">" => Some(RedirectMode::Overwrite),
        ">>" => Some(RedirectMode::Append),
        _ => None,
    }
}
