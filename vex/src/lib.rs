//! Vex — a compact bytecode regex engine
//!
//! Patterns compile to a flat instruction program which a backtracking
//! virtual machine interprets against a byte string. The pipeline is
//! pattern -> tokens -> AST -> instructions at construction time, then
//! (instructions, input) -> match result per query.
//!
//! Input is treated as raw 8-bit bytes throughout; there is no Unicode
//! handling. Quantifiers are greedy only, and a handle runs one match at
//! a time — clone it for parallel use.

pub mod ast;
pub mod charclass;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod replace;
pub mod vm;

pub use ast::{Ast, ClassSet};
pub use charclass::ClassKind;
pub use compiler::{Compiler, Inst, Program};
pub use engine::{Capture, Flags, MatchResult, Regex};
pub use error::{RegexError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, Parser};
pub use vm::Vm;

/// Compile a pattern into a reusable [`Regex`] handle
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
}

/// One-shot: does `pattern` match at the start of `text`?
pub fn matches(text: &[u8], pattern: &str) -> Result<bool> {
    let mut regex = Regex::new(pattern)?;
    Ok(regex.matches(text))
}

/// One-shot: all non-overlapping matches of `pattern` in `text`
pub fn search_all(text: &[u8], pattern: &str) -> Result<Vec<MatchResult>> {
    let mut regex = Regex::new(pattern)?;
    Ok(regex.search_all(text))
}

/// One-shot: replace every match of `pattern` in `text`
pub fn replace(text: &[u8], pattern: &str, replacement: &[u8]) -> Result<Vec<u8>> {
    let mut regex = Regex::new(pattern)?;
    Ok(regex.replace_all(text, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        // full pipeline: pattern -> tokens -> AST -> bytecode -> match
        let mut regex = compile(r"(\d+)").unwrap();
        let found = regex.search(b"order 42").unwrap();
        assert_eq!(found.matched_text, b"42");
        assert_eq!(found.group(1), Some(&b"42"[..]));
    }

    #[test]
    fn test_one_shot_helpers() {
        assert!(matches(b"abc", "a").unwrap());
        assert!(!matches(b"abc", "b").unwrap());
        assert_eq!(search_all(b"a1b2", r"\d").unwrap().len(), 2);
        assert_eq!(replace(b"a1b2", r"\d", b"_").unwrap(), b"a_b_");
    }

    #[test]
    fn test_compile_error_propagates() {
        assert!(compile("[oops").is_err());
        assert!(matches(b"x", "(").is_err());
    }
}
