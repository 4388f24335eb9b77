//! Error types for pattern compilation
//!
//! All compile-time failures are collected in [`RegexError`], built on the
//! `thiserror` crate. Every variant carries the byte offset in the pattern
//! where the problem was detected, so callers can point at the offending
//! spot. Run-time non-match is never an error; matching APIs report it as
//! `None` or an empty result set.

use thiserror::Error;

/// The error type produced by [`crate::Regex::new`] and friends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// A backslash at the very end of the pattern
    #[error("incomplete escape sequence at position {position}")]
    IncompleteEscape {
        /// Offset of the dangling backslash
        position: usize,
    },

    /// `(` without a matching `)`
    #[error("unclosed group at position {position}")]
    UnclosedGroup {
        /// Offset of the opening parenthesis
        position: usize,
    },

    /// `[` without a matching `]`
    #[error("unclosed character class at position {position}")]
    UnclosedClass {
        /// Offset of the opening bracket
        position: usize,
    },

    /// `{` without a matching `}`
    #[error("unclosed quantifier at position {position}")]
    UnclosedQuantifier {
        /// Offset of the opening brace
        position: usize,
    },

    /// `(?` followed by something other than `:`, `=` or `!`
    #[error("invalid group modifier at position {position}")]
    InvalidGroupModifier {
        /// Offset of the `?`
        position: usize,
    },

    /// A token where no atom can start
    #[error("unexpected token at position {position}")]
    UnexpectedToken {
        /// Offset of the token
        position: usize,
    },

    /// The pattern ended where an expression was required
    #[error("unexpected end of pattern at position {position}")]
    UnexpectedEnd {
        /// Offset just past the last token
        position: usize,
    },

    /// Leftover tokens after the root expression
    #[error("unexpected tokens at end of pattern at position {position}")]
    TrailingTokens {
        /// Offset of the first leftover token
        position: usize,
    },
}

impl RegexError {
    /// Byte offset in the pattern where the error was detected
    pub fn position(&self) -> usize {
        match *self {
            RegexError::IncompleteEscape { position }
            | RegexError::UnclosedGroup { position }
            | RegexError::UnclosedClass { position }
            | RegexError::UnclosedQuantifier { position }
            | RegexError::InvalidGroupModifier { position }
            | RegexError::UnexpectedToken { position }
            | RegexError::UnexpectedEnd { position }
            | RegexError::TrailingTokens { position } => position,
        }
    }
}

/// Result type alias for compilation
pub type Result<T> = std::result::Result<T, RegexError>;
