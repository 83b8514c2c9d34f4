//! Identifiers and qualified names.

use core::fmt;

use serde::Serialize;

use crate::lexer::Span;

/// An identifier as written in the source, unquoted and unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ident {
    pub value: String,
    /// Whether the identifier was delimited (`"x"`, `` `x` ``, `[x]`).
    pub quoted: bool,
    pub span: Span,
}

impl Ident {
    #[must_use]
    pub fn new(value: impl Into<String>, quoted: bool, span: Span) -> Self {
        Self {
            value: value.into(),
            quoted,
            span,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A possibly schema-qualified object name (`schema.table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectName {
    pub schema: Option<Ident>,
    pub name: Ident,
    pub span: Span,
}

impl ObjectName {
    /// Returns the name without its schema.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the schema, if the name is qualified.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_ref().map(Ident::as_str)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
