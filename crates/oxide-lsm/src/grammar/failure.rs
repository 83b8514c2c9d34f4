//! Rule failures produced while evaluating grammar rules.

use core::fmt;

use thiserror::Error;

use crate::lexer::{LexError, Position};

/// A recoverable mismatch: the input did not match what a rule expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFailure {
    /// Where the mismatching token starts.
    pub position: Position,
    /// What would have been accepted, in the order the rules asked for it.
    pub expected: Vec<String>,
    /// Description of the token actually found.
    pub found: String,
}

impl SyntaxFailure {
    #[must_use]
    pub fn new(position: Position, expected: Vec<String>, found: impl Into<String>) -> Self {
        Self {
            position,
            expected,
            found: found.into(),
        }
    }

    /// Combines two failures: the one that got further wins, and failures at
    /// the same position pool their expectations.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        match self.position.offset.cmp(&other.position.offset) {
            core::cmp::Ordering::Greater => self,
            core::cmp::Ordering::Less => other,
            core::cmp::Ordering::Equal => {
                for item in other.expected {
                    if !self.expected.contains(&item) {
                        self.expected.push(item);
                    }
                }
                self
            }
        }
    }

    /// Renders the "expected X, Y or Z, found W" message.
    #[must_use]
    pub fn message(&self) -> String {
        match self.expected.as_slice() {
            [] => format!("unexpected {}", self.found),
            [only] => format!("expected {only}, found {}", self.found),
            [init @ .., last] => {
                format!("expected {} or {last}, found {}", init.join(", "), self.found)
            }
        }
    }
}

impl fmt::Display for SyntaxFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message(), self.position)
    }
}

/// Why a grammar rule did not produce a value.
///
/// Only `Syntax` failures are recoverable; combinators pass the others
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleFailure {
    #[error("{0}")]
    Syntax(SyntaxFailure),

    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error("analysis cancelled")]
    Cancelled,

    /// The input nests deeper than the engine recurses.
    #[error("expression nested too deeply at {0}")]
    TooDeep(Position),
}

impl RuleFailure {
    /// Returns true for failures no alternative can recover from.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Syntax(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(offset: usize, expected: &[&str]) -> SyntaxFailure {
        SyntaxFailure::new(
            Position::new(offset, 1, offset + 1),
            expected.iter().map(|s| String::from(*s)).collect(),
            "'x'",
        )
    }

    #[test]
    fn test_merge_prefers_furthest() {
        let merged = failure(3, &["FROM"]).merge(failure(7, &["identifier"]));
        assert_eq!(merged.position.offset, 7);
        assert_eq!(merged.expected, vec!["identifier"]);

        let merged = failure(9, &["')'"]).merge(failure(7, &["identifier"]));
        assert_eq!(merged.position.offset, 9);
    }

    #[test]
    fn test_merge_pools_expectations_at_same_position() {
        let merged = failure(0, &["SELECT", "INSERT"]).merge(failure(0, &["INSERT", "UPDATE"]));
        assert_eq!(merged.expected, vec!["SELECT", "INSERT", "UPDATE"]);
    }

    #[test]
    fn test_message() {
        assert_eq!(failure(0, &[]).message(), "unexpected 'x'");
        assert_eq!(failure(0, &["FROM"]).message(), "expected FROM, found 'x'");
        assert_eq!(
            failure(0, &["SELECT", "INSERT", "UPDATE"]).message(),
            "expected SELECT, INSERT or UPDATE, found 'x'"
        );
    }

    #[test]
    fn test_terminal() {
        assert!(RuleFailure::Cancelled.is_terminal());
        assert!(RuleFailure::TooDeep(Position::new(0, 1, 1)).is_terminal());
        assert!(!RuleFailure::Syntax(failure(0, &[])).is_terminal());
    }
}
