//! Regex facade and match results
//!
//! [`Regex`] owns the compiled program together with the VM scratch state
//! used to run it, which is why the matching methods take `&mut self`: one
//! handle supports one match at a time. Handles are cheap to clone and a
//! clone shares nothing mutable with the original, so parallel matching is
//! clone-per-thread.

use crate::compiler::{Compiler, Program};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::replace;
use crate::vm::Vm;

/// Compile-time option flags
///
/// All four are accepted and stored on the handle, and none of them alters
/// matching yet; they exist so patterns can declare intent ahead of the
/// semantics being wired up. `.` always matches newline and `^`/`$` always
/// mean whole-input boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// Case-insensitive matching (unwired)
    pub case_insensitive: bool,
    /// `^`/`$` match line boundaries (unwired)
    pub multiline: bool,
    /// `.` matches newline — already the default behavior
    pub dotall: bool,
    /// Extended pattern whitespace (unwired; space and tab in a pattern
    /// are always skipped)
    pub extended: bool,
}

/// One reported capture span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Start offset in the input
    pub start: usize,
    /// End offset in the input (exclusive)
    pub end: usize,
    /// The captured bytes
    pub text: Vec<u8>,
}

/// The outcome of a successful match
///
/// `captures` holds the groups that survived the containment filter: a
/// group strictly inside another reported group's span is omitted, and a
/// surviving group that never matched is a `None` entry at its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Where the match starts in the input
    pub position: usize,
    /// The matched bytes
    pub matched_text: Vec<u8>,
    /// Reported capture groups, in index order
    pub captures: Vec<Option<Capture>>,
}

impl MatchResult {
    /// Length of the whole match in bytes
    pub fn len(&self) -> usize {
        self.matched_text.len()
    }

    /// True for a zero-width match
    pub fn is_empty(&self) -> bool {
        self.matched_text.is_empty()
    }

    /// Offset just past the match
    pub fn end(&self) -> usize {
        self.position + self.matched_text.len()
    }

    /// Bytes of group `index`; 0 is the whole match
    pub fn group(&self, index: usize) -> Option<&[u8]> {
        if index == 0 {
            return Some(&self.matched_text);
        }
        self.captures
            .get(index - 1)?
            .as_ref()
            .map(|c| c.text.as_slice())
    }

    /// Start offset of group `index`; 0 is the whole match
    pub fn group_start(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(self.position);
        }
        self.captures.get(index - 1)?.as_ref().map(|c| c.start)
    }

    /// End offset of group `index`; 0 is the whole match
    pub fn group_end(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(self.end());
        }
        self.captures.get(index - 1)?.as_ref().map(|c| c.end)
    }
}

/// A compiled regular expression
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    flags: Flags,
    program: Program,
    vm: Vm,
}

impl Regex {
    /// Compile a pattern with default flags
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Compile a pattern with explicit flags
    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Self> {
        let tokens = Lexer::new(pattern).tokenize()?;
        let mut parser = Parser::new(&tokens);
        let ast = parser.parse()?;
        let program = Compiler::compile(&ast, parser.capture_count());
        let vm = Vm::new(program.capture_count);
        Ok(Regex {
            pattern: pattern.to_string(),
            flags,
            program,
            vm,
        })
    }

    /// Attempt a match starting at exactly `start`
    pub fn match_at(&mut self, text: &[u8], start: usize) -> Option<MatchResult> {
        self.vm.execute_at(&self.program, text, start)
    }

    /// True when the pattern matches at the very start of the input
    pub fn matches(&mut self, text: &[u8]) -> bool {
        self.match_at(text, 0).is_some()
    }

    /// Find the first match anywhere in the input
    pub fn search(&mut self, text: &[u8]) -> Option<MatchResult> {
        self.search_from(text, 0)
    }

    /// Find the first match at or after `start`
    pub fn search_from(&mut self, text: &[u8], start: usize) -> Option<MatchResult> {
        self.vm.search(&self.program, text, start)
    }

    /// Collect all non-overlapping matches, left to right
    ///
    /// After a hit of length l at position p the scan resumes at
    /// `p + max(l, 1)`. A zero-width hit immediately after another
    /// zero-width probe is not recorded; the scan advances one byte
    /// instead, so the procedure terminates on every input.
    pub fn search_all(&mut self, text: &[u8]) -> Vec<MatchResult> {
        let mut results = Vec::new();
        let mut pos = 0;
        let mut prev_len = 0;

        while pos <= text.len() {
            match self.vm.execute_at(&self.program, text, pos) {
                Some(result) => {
                    let len = result.len();
                    if len == 0 && prev_len == 0 && pos < text.len() {
                        pos += 1;
                        continue;
                    }
                    pos = result.position + len.max(1);
                    prev_len = len;
                    results.push(result);
                }
                None => {
                    pos += 1;
                    prev_len = 0;
                }
            }
        }
        results
    }

    /// Replace the first match, or every match when `all` is set
    ///
    /// The scan resumes just past the inserted replacement, never inside
    /// it, so replacements cannot cascade into each other. See
    /// [`crate::replace`] for the template escapes.
    pub fn replace(&mut self, text: &[u8], replacement: &[u8], all: bool) -> Vec<u8> {
        let mut result = text.to_vec();

        if all {
            let mut pos = 0;
            while pos < result.len() {
                let found = match self.vm.search(&self.program, &result, pos) {
                    Some(found) => found,
                    None => break,
                };
                let expansion = replace::expand(replacement, &found);
                let inserted = expansion.len();
                result.splice(found.position..found.end(), expansion);
                pos = found.position + inserted;
            }
        } else if let Some(found) = self.vm.search(&self.program, &result, 0) {
            let expansion = replace::expand(replacement, &found);
            result.splice(found.position..found.end(), expansion);
        }
        result
    }

    /// Replace every match
    pub fn replace_all(&mut self, text: &[u8], replacement: &[u8]) -> Vec<u8> {
        self.replace(text, replacement, true)
    }

    /// The source pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The flags the handle was compiled with
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of capturing groups in the pattern
    pub fn capture_count(&self) -> usize {
        self.program.capture_count - 1
    }

    /// Whether the handle holds a compiled program
    ///
    /// Construction is fallible, so a handle in hand is always compiled;
    /// this exists for parity with [`crate::compile`].
    pub fn is_compiled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_anchored_at_start() {
        let mut regex = Regex::new("cat|dog|bird").unwrap();
        assert!(!regex.matches(b"I have a cat"));
        let found = regex.search(b"I have a cat").unwrap();
        assert_eq!(found.matched_text, b"cat");
        assert_eq!(found.position, 9);
    }

    #[test]
    fn test_match_at_offset() {
        let mut regex = Regex::new("bc").unwrap();
        assert!(regex.match_at(b"abc", 0).is_none());
        let found = regex.match_at(b"abc", 1).unwrap();
        assert_eq!(found.position, 1);
    }

    #[test]
    fn test_group_accessors() {
        let mut regex = Regex::new(r"(\d+)-(\d+)").unwrap();
        let found = regex.match_at(b"123-456", 0).unwrap();
        assert_eq!(found.group(0), Some(&b"123-456"[..]));
        assert_eq!(found.group(1), Some(&b"123"[..]));
        assert_eq!(found.group(2), Some(&b"456"[..]));
        assert_eq!(found.group(3), None);
        assert_eq!(found.group_start(2), Some(4));
        assert_eq!(found.group_end(0), Some(7));
    }

    #[test]
    fn test_search_all_non_overlapping() {
        let mut regex = Regex::new("aa").unwrap();
        let results = regex.search_all(b"aaaa");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].position, 2);
    }

    #[test]
    fn test_search_all_zero_width_terminates() {
        let mut regex = Regex::new("x*").unwrap();
        let results = regex.search_all(b"abc");
        // mid-text zero-width probes are suppressed; only the end survives
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 3);
    }

    #[test]
    fn test_replace_first_only() {
        let mut regex = Regex::new(r"\d+").unwrap();
        let result = regex.replace(b"a1b2", b"#", false);
        assert_eq!(result, b"a#b2");
    }

    #[test]
    fn test_replace_does_not_cascade() {
        // the inserted text contains a fresh match; the scan must not
        // re-enter it
        let mut regex = Regex::new("a").unwrap();
        let result = regex.replace_all(b"aa", b"aa");
        assert_eq!(result, b"aaaa");
    }

    #[test]
    fn test_flags_are_stored_but_inert() {
        let flags = Flags {
            case_insensitive: true,
            ..Flags::default()
        };
        let mut regex = Regex::with_flags("abc", flags).unwrap();
        assert_eq!(regex.flags(), flags);
        assert!(regex.matches(b"abc"));
        assert!(!regex.matches(b"ABC"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Regex::new(r"\w+").unwrap();
        let mut copy = original.clone();
        assert_eq!(copy.pattern(), original.pattern());
        assert!(original.matches(b"one"));
        assert!(copy.matches(b"two"));
    }

    #[test]
    fn test_handle_reports_compiled() {
        let regex = Regex::new("a").unwrap();
        assert!(regex.is_compiled());
        assert_eq!(regex.pattern(), "a");
        assert_eq!(regex.capture_count(), 0);
    }
}
