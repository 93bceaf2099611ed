/// Splits an input line into tokens, resolving single quotes, double quotes,
/// and backslash escapes.
///
/// Tokenization is total: unterminated quotes are implicitly closed at end of
/// input and the accumulated characters become part of the final token.
/// Operator characters (`|`, `>`) are not word-breaking; `a|b` is one token.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut mode = Mode::Normal;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Normal => match c {
                '\'' => mode = Mode::Single,
                '"' => mode = Mode::Double,
                '\\' => current.push(chars.next().unwrap_or('\\')),
                ' ' | '\t' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
            // No escapes of any kind inside single quotes.
            Mode::Single => match c {
                '\'' => mode = Mode::Normal,
                _ => current.push(c),
            },
            Mode::Double => match c {
                '"' => mode = Mode::Normal,
                '\\' => match chars.next() {
                    Some('"') => current.push('"'),
                    Some('\\') => current.push('\\'),
                    // The backslash is preserved when the next character has
                    // no special meaning inside double quotes.
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => current.push('\\'),
                },
                _ => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

enum Mode {
    Normal,
    Single,
    Double,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<String> {
        tokenize(input)
    }

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(toks("echo hello   world"), vec!["echo", "hello", "world"]);
        assert_eq!(toks("  a\t b  "), vec!["a", "b"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(toks("").is_empty());
        assert!(toks("   \t ").is_empty());
    }

    #[test]
    fn double_quotes_preserve_inner_whitespace() {
        assert_eq!(toks(r#"echo "hello  world""#), vec!["echo", "hello  world"]);
    }

    #[test]
    fn single_quotes_take_everything_literally() {
        assert_eq!(toks(r"echo 'a\nb'"), vec!["echo", r"a\nb"]);
        assert_eq!(toks(r#"'say "hi"'"#), vec![r#"say "hi""#]);
    }

    #[test]
    fn adjacent_quoted_runs_concatenate() {
        assert_eq!(toks("'foo''bar'"), vec!["foobar"]);
        assert_eq!(toks(r#"a"b"'c'"#), vec!["abc"]);
    }

    #[test]
    fn empty_quote_pairs_emit_nothing() {
        assert!(toks("''").is_empty());
        assert!(toks(r#""""#).is_empty());
        assert_eq!(toks("a''b"), vec!["ab"]);
    }

    #[test]
    fn backslash_escapes_anything_outside_quotes() {
        assert_eq!(toks(r"a\ b"), vec!["a b"]);
        assert_eq!(toks(r"\'quoted\'"), vec!["'quoted'"]);
        assert_eq!(toks(r"c\at"), vec!["cat"]);
    }

    #[test]
    fn trailing_backslash_is_literal() {
        assert_eq!(toks(r"foo\"), vec![r"foo\"]);
        assert_eq!(toks(r#""foo\"#), vec![r"foo\"]);
    }

    #[test]
    fn double_quote_escapes() {
        assert_eq!(toks(r#""a\"b""#), vec![r#"a"b"#]);
        assert_eq!(toks(r#""a\\b""#), vec![r"a\b"]);
        // Backslash kept when the escape has no special meaning.
        assert_eq!(toks(r#""a\nb""#), vec![r"a\nb"]);
    }

    #[test]
    fn operators_are_not_word_breaking() {
        assert_eq!(toks("a|b"), vec!["a|b"]);
        assert_eq!(toks("a | b"), vec!["a", "|", "b"]);
        assert_eq!(toks("echo x>f"), vec!["echo", "x>f"]);
    }

    #[test]
    fn unterminated_quotes_close_at_end_of_input() {
        assert_eq!(toks("'abc"), vec!["abc"]);
        assert_eq!(toks(r#""abc def"#), vec!["abc def"]);
    }

    #[test]
    fn unescaped_quotes_are_syntax_not_payload() {
        assert_eq!(toks(r#""a"'b'"#), vec!["ab"]);
        for token in toks(r#"echo "a b" 'c d'"#) {
            assert!(!token.contains('"'));
            assert!(!token.contains('\''));
        }
    }

    #[test]
    fn join_round_trip_for_plain_tokens() {
        let tokens = vec!["ls".to_string(), "-la".to_string(), "/tmp".to_string()];
        assert_eq!(toks(&tokens.join(" ")), tokens);
    }
}
