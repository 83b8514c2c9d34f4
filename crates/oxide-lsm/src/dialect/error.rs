//! Errors raised while building or registering dialects.

use thiserror::Error;

use super::ModelKind;

/// Why a dialect could not be built or registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    #[error("dialect {dialect} registers more than one entry point for {model} models")]
    DuplicateEntry { dialect: String, model: ModelKind },

    #[error("a dialect named {0} is already registered")]
    DuplicateName(String),

    #[error("dialect name must not be empty")]
    EmptyName,
}
