//! Parameter map line parsing
//!
//! The map file is line-oriented text: `<logical_name> <kind> <device_node>`
//! per entry, tokens optionally quoted, `#` comments, blank lines ignored.

use contracts::SettingDescriptor;

/// Outcome of parsing one line
#[derive(Debug)]
pub(crate) enum LineOutcome {
    /// Blank line or comment
    Skip,

    /// Well-formed entry
    Entry(SettingDescriptor),

    /// Wrong token count; caller logs and skips
    Malformed,
}

/// Parse a single map-file line
pub(crate) fn parse_line(line: &str) -> LineOutcome {
    let tokens = tokenize(line);
    match tokens.first() {
        None => LineOutcome::Skip,
        Some(first) if first.starts_with('#') => LineOutcome::Skip,
        _ if tokens.len() != 3 => LineOutcome::Malformed,
        _ => LineOutcome::Entry(SettingDescriptor::new(
            tokens[0].as_str(),
            tokens[1].as_str(),
            tokens[2].as_str(),
        )),
    }
}

/// Split a line into whitespace-separated tokens, respecting quoted
/// substrings. A token starting with `"` runs to the closing quote and may
/// contain whitespace; `\"` escapes a quote inside it.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut escaped = false;
            for ch in chars.by_ref() {
                if escaped {
                    token.push(ch);
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    break;
                } else {
                    token.push(ch);
                }
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SettingKind;

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(tokenize("gain float Gain"), vec!["gain", "float", "Gain"]);
    }

    #[test]
    fn test_tokenize_quoted_with_spaces() {
        assert_eq!(
            tokenize(r#"mode enum "Acquisition Mode""#),
            vec!["mode", "enum", "Acquisition Mode"]
        );
    }

    #[test]
    fn test_tokenize_escaped_quote() {
        assert_eq!(tokenize(r#""say \"hi\"""#), vec![r#"say "hi""#]);
    }

    #[test]
    fn test_parse_entry() {
        match parse_line("exposure_time float ExposureTime") {
            LineOutcome::Entry(desc) => {
                assert_eq!(desc.name, "exposure_time");
                assert_eq!(desc.kind, Some(SettingKind::Float));
                assert_eq!(desc.node, "ExposureTime");
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_comment_and_blank() {
        assert!(matches!(parse_line("# a comment"), LineOutcome::Skip));
        assert!(matches!(parse_line("   "), LineOutcome::Skip));
        assert!(matches!(parse_line(""), LineOutcome::Skip));
    }

    #[test]
    fn test_parse_wrong_token_count() {
        assert!(matches!(parse_line("gain float"), LineOutcome::Malformed));
        assert!(matches!(
            parse_line("gain float Gain extra"),
            LineOutcome::Malformed
        ));
    }

    #[test]
    fn test_unknown_kind_still_parses() {
        match parse_line("weird double Weird") {
            LineOutcome::Entry(desc) => assert_eq!(desc.kind, None),
            other => panic!("expected entry, got {other:?}"),
        }
    }
}
