//! Replacement-template expansion
//!
//! A replacement string may refer back to the match that is being
//! replaced:
//! - `\0`..`\9` and `$0`..`$9` expand a capture group, with 0 meaning the
//!   whole match; a group that does not exist or did not participate
//!   expands to nothing
//! - `\n`, `\r`, `\t` insert the control byte
//! - `\x` for any other byte inserts `x` itself
//! - `$` not followed by a digit is a literal dollar sign

use crate::engine::MatchResult;

/// Expand a replacement template against one match
pub fn expand(template: &[u8], found: &MatchResult) -> Vec<u8> {
    let mut out = Vec::with_capacity(template.len());
    let mut i = 0;

    while i < template.len() {
        let byte = template[i];
        if byte == b'\\' && i + 1 < template.len() {
            i += 1;
            let next = template[i];
            if next.is_ascii_digit() {
                let group = usize::from(next - b'0');
                out.extend_from_slice(found.group(group).unwrap_or(b""));
            } else {
                match next {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    other => out.push(other),
                }
            }
        } else if byte == b'$' && i + 1 < template.len() {
            i += 1;
            let next = template[i];
            if next.is_ascii_digit() {
                let group = usize::from(next - b'0');
                out.extend_from_slice(found.group(group).unwrap_or(b""));
            } else {
                out.push(b'$');
                out.push(next);
            }
        } else {
            out.push(byte);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Capture;

    fn match_with_groups(text: &[u8], groups: &[Option<(usize, usize)>]) -> MatchResult {
        MatchResult {
            position: 0,
            matched_text: text.to_vec(),
            captures: groups
                .iter()
                .map(|span| {
                    span.map(|(start, end)| Capture {
                        start,
                        end,
                        text: text[start..end].to_vec(),
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let found = match_with_groups(b"abc", &[]);
        assert_eq!(expand(b"hello", &found), b"hello");
    }

    #[test]
    fn test_backslash_group() {
        let found = match_with_groups(b"abc", &[Some((1, 2))]);
        assert_eq!(expand(br"[\1]", &found), b"[b]");
    }

    #[test]
    fn test_dollar_group() {
        let found = match_with_groups(b"ab", &[Some((0, 1)), Some((1, 2))]);
        assert_eq!(expand(b"$2-$1", &found), b"b-a");
    }

    #[test]
    fn test_group_zero_is_whole_match() {
        let found = match_with_groups(b"hello", &[]);
        assert_eq!(expand(br"<\0>", &found), b"<hello>");
        assert_eq!(expand(b"<$0>", &found), b"<hello>");
    }

    #[test]
    fn test_missing_group_expands_empty() {
        let found = match_with_groups(b"abc", &[None]);
        assert_eq!(expand(br"x\1y", &found), b"xy");
        assert_eq!(expand(br"x\7y", &found), b"xy");
    }

    #[test]
    fn test_control_escapes() {
        let found = match_with_groups(b"", &[]);
        assert_eq!(expand(br"a\nb\tc\r", &found), b"a\nb\tc\r");
    }

    #[test]
    fn test_other_escape_is_literal() {
        let found = match_with_groups(b"", &[]);
        assert_eq!(expand(br"\[\\\]", &found), br"[\]");
    }

    #[test]
    fn test_lone_dollar_and_trailing_backslash() {
        let found = match_with_groups(b"", &[]);
        assert_eq!(expand(b"a$b", &found), b"a$b");
        assert_eq!(expand(b"cost: $", &found), b"cost: $");
        assert_eq!(expand(br"end\", &found), br"end\");
    }
}
