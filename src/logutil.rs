//! Keep player-typed text on one log line.

const MAX_LOGGED_CHARS: usize = 120;

/// Escape control characters (newlines, tabs, escape sequences) and cap the
/// length so a pasted block of text cannot spread across the log.
pub fn escape_log(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_LOGGED_CHARS) + 3);
    for (count, ch) in input.chars().enumerate() {
        if count == MAX_LOGGED_CHARS {
            out.push_str("...");
            break;
        }
        if ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(escape_log("take\tkey\n"), "take\\tkey\\n");
        assert_eq!(escape_log("\u{1b}[2J"), "\\u{1b}[2J");
    }

    #[test]
    fn runes_and_backslashes_pass_through() {
        assert_eq!(escape_log(r"read ᚦ\x"), r"read ᚦ\x");
    }

    #[test]
    fn long_input_is_capped() {
        let long = "n".repeat(500);
        let escaped = escape_log(&long);
        assert!(escaped.ends_with("..."));
        assert_eq!(escaped.chars().count(), 123);
    }
}
