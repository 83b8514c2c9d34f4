//! The error type every analysis outcome carries.

use core::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::grammar::RuleFailure;
use crate::lexer::{LexError, Position};

/// Broad classification of an analysis failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisErrorKind {
    /// The text could not be tokenized.
    Lexical,
    /// The tokens did not match the grammar.
    Syntax,
    /// The dialect cannot produce the requested model.
    Unsupported,
    /// The caller cancelled the analysis.
    Cancelled,
    /// Reading the source failed.
    Io,
    /// No dialect is registered under the requested name.
    UnknownDialect,
    /// The worker running the analysis died.
    Internal,
}

impl AnalysisErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Unsupported => "unsupported",
            Self::Cancelled => "cancelled",
            Self::Io => "io",
            Self::UnknownDialect => "unknown dialect",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an analysis produced no model.
///
/// Lexical and syntax errors carry the position they were detected at;
/// syntax errors also list what the grammar would have accepted there and
/// describe the token it found instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub message: String,
    pub position: Option<Position>,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)?;
        if let Some(position) = self.position {
            write!(f, " at {position}")?;
        }
        Ok(())
    }
}

impl AnalysisError {
    /// Creates an error with no position information.
    #[must_use]
    pub fn new(kind: AnalysisErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            expected: Vec::new(),
            found: None,
        }
    }

    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(AnalysisErrorKind::Unsupported, message)
    }

    #[must_use]
    pub fn unknown_dialect(name: &str) -> Self {
        Self::new(
            AnalysisErrorKind::UnknownDialect,
            format!("no dialect named '{name}'"),
        )
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(AnalysisErrorKind::Cancelled, "analysis cancelled")
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AnalysisErrorKind::Internal, message)
    }

    /// Returns true if the caller cancelled the analysis.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == AnalysisErrorKind::Cancelled
    }
}

impl From<LexError> for AnalysisError {
    fn from(err: LexError) -> Self {
        Self {
            position: Some(err.position),
            ..Self::new(AnalysisErrorKind::Lexical, err.kind.to_string())
        }
    }
}

impl From<RuleFailure> for AnalysisError {
    fn from(failure: RuleFailure) -> Self {
        match failure {
            RuleFailure::Syntax(failure) => Self {
                kind: AnalysisErrorKind::Syntax,
                message: failure.message(),
                position: Some(failure.position),
                expected: failure.expected,
                found: Some(failure.found),
            },
            RuleFailure::Lexical(err) => err.into(),
            RuleFailure::Cancelled => Self::cancelled(),
            RuleFailure::TooDeep(position) => Self {
                position: Some(position),
                ..Self::new(AnalysisErrorKind::Syntax, "expression nested too deeply")
            },
        }
    }
}

impl From<io::Error> for AnalysisError {
    fn from(err: io::Error) -> Self {
        Self::new(AnalysisErrorKind::Io, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SyntaxFailure;
    use crate::lexer::LexErrorKind;

    #[test]
    fn test_syntax_failure_conversion() {
        let failure = SyntaxFailure::new(
            Position::new(9, 1, 10),
            vec![String::from("FROM"), String::from("','")],
            "'WHERE'",
        );
        let err = AnalysisError::from(RuleFailure::Syntax(failure));
        assert_eq!(err.kind, AnalysisErrorKind::Syntax);
        assert_eq!(err.message, "expected FROM or ',', found 'WHERE'");
        assert_eq!(err.expected, vec!["FROM", "','"]);
        assert_eq!(err.found.as_deref(), Some("'WHERE'"));
        assert_eq!(
            err.to_string(),
            "syntax error: expected FROM or ',', found 'WHERE' at line 1, column 10"
        );
    }

    #[test]
    fn test_lexical_conversion_keeps_position() {
        let lex = LexError::new(LexErrorKind::UnterminatedString, Position::new(7, 1, 8));
        let err = AnalysisError::from(RuleFailure::Lexical(lex));
        assert_eq!(err.kind, AnalysisErrorKind::Lexical);
        assert_eq!(err.position, Some(Position::new(7, 1, 8)));
        assert!(err.expected.is_empty());
    }

    #[test]
    fn test_cancelled_has_no_position() {
        let err = AnalysisError::from(RuleFailure::Cancelled);
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "cancelled error: analysis cancelled");
    }

    #[test]
    fn test_nesting_limit_is_a_syntax_error() {
        let err = AnalysisError::from(RuleFailure::TooDeep(Position::new(140, 1, 141)));
        assert_eq!(err.kind, AnalysisErrorKind::Syntax);
        assert_eq!(err.message, "expression nested too deeply");
        assert_eq!(err.position, Some(Position::new(140, 1, 141)));
    }

    #[test]
    fn test_serializes_kind_in_kebab_case() {
        let json = serde_json::to_value(AnalysisError::unknown_dialect("oracle")).unwrap();
        assert_eq!(json["kind"], "unknown-dialect");
        assert_eq!(json["position"], serde_json::Value::Null);
    }
}
