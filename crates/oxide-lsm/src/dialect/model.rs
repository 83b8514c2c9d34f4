//! Statement model types and the entry rules that produce them.

use core::fmt;

use serde::Serialize;

use crate::ast::{
    CreateTableStatement, DeleteStatement, Expr, InsertStatement, PragmaStatement, Script,
    SelectStatement, Statement, UpdateStatement,
};
use crate::grammar::Rule;

/// Tag identifying a statement model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Statement,
    Select,
    Insert,
    Update,
    Delete,
    CreateTable,
    Pragma,
    Script,
    Expression,
}

impl ModelKind {
    /// Every model kind, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::Statement,
        Self::Select,
        Self::Insert,
        Self::Update,
        Self::Delete,
        Self::CreateTable,
        Self::Pragma,
        Self::Script,
        Self::Expression,
    ];

    /// Returns the kebab-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::CreateTable => "create-table",
            Self::Pragma => "pragma",
            Self::Script => "script",
            Self::Expression => "expression",
        }
    }

    /// Looks a kind up by name (case-insensitive, `_` and `-` interchangeable).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&name))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grammar entry rule, typed by the model it produces.
#[derive(Debug, Clone, Copy)]
pub enum EntryPoint {
    Statement(Rule<Statement>),
    Select(Rule<SelectStatement>),
    Insert(Rule<InsertStatement>),
    Update(Rule<UpdateStatement>),
    Delete(Rule<DeleteStatement>),
    CreateTable(Rule<CreateTableStatement>),
    Pragma(Rule<PragmaStatement>),
    Script(Rule<Script>),
    Expression(Rule<Expr>),
}

impl EntryPoint {
    /// Returns the kind of model the rule produces.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Statement(_) => ModelKind::Statement,
            Self::Select(_) => ModelKind::Select,
            Self::Insert(_) => ModelKind::Insert,
            Self::Update(_) => ModelKind::Update,
            Self::Delete(_) => ModelKind::Delete,
            Self::CreateTable(_) => ModelKind::CreateTable,
            Self::Pragma(_) => ModelKind::Pragma,
            Self::Script(_) => ModelKind::Script,
            Self::Expression(_) => ModelKind::Expression,
        }
    }
}

/// A type a dialect can produce from source text.
///
/// Implemented for every top-level AST type so analyses can be requested by
/// type: `dialect.find_analysis_case::<SelectStatement>()`.
pub trait StatementModel: fmt::Debug + Send + Sync + Sized + 'static {
    /// The tag this type is registered under.
    const KIND: ModelKind;

    /// Extracts the typed rule from an entry point of the same kind.
    fn entry(entry: &EntryPoint) -> Option<Rule<Self>>;
}

macro_rules! impl_statement_model {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl StatementModel for $ty {
                const KIND: ModelKind = ModelKind::$kind;

                fn entry(entry: &EntryPoint) -> Option<Rule<Self>> {
                    match entry {
                        EntryPoint::$kind(rule) => Some(*rule),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_statement_model!(
    Statement => Statement,
    SelectStatement => Select,
    InsertStatement => Insert,
    UpdateStatement => Update,
    DeleteStatement => Delete,
    CreateTableStatement => CreateTable,
    PragmaStatement => Pragma,
    Script => Script,
    Expr => Expression,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    #[test]
    fn test_model_kind_names() {
        assert_eq!(ModelKind::from_name("create_table"), Some(ModelKind::CreateTable));
        assert_eq!(ModelKind::from_name("SELECT"), Some(ModelKind::Select));
        assert_eq!(ModelKind::from_name("vacuum"), None);
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_name(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_entry_matches_kind() {
        let entry = EntryPoint::Select(grammar::select_statement);
        assert_eq!(entry.kind(), SelectStatement::KIND);
        assert!(SelectStatement::entry(&entry).is_some());
        assert!(InsertStatement::entry(&entry).is_none());
    }
}
