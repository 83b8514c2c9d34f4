//! SQL dialect support.
//!
//! Each supported database is described by an immutable [`Dialect`]: its
//! lexical rules, its grammar rule table and the statement models it can
//! produce. Dialects are looked up by name through a [`DialectRegistry`];
//! [`dialect_for`] consults the process-wide registry of built-in dialects.
//!
//! ```
//! use oxide_lsm::ast::SelectStatement;
//! use oxide_lsm::dialect::dialect_for;
//!
//! let dialect = dialect_for("sqlite").unwrap();
//! let case = dialect.find_analysis_case::<SelectStatement>().unwrap();
//! let select = case.parse(&"SELECT a FROM t".into()).unwrap();
//! assert_eq!(select.columns.len(), 1);
//! ```

mod error;
mod model;
mod mysql;
mod postgres;
mod sql92;
mod sqlite;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

pub use error::DialectError;
pub use model::{EntryPoint, ModelKind, StatementModel};

use crate::analysis::{Analysis, AnalysisCase, AnalysisError};
use crate::grammar::{self, GrammarRules, Syntax};
use crate::lexer::{Keyword, LexError, LexicalRules, Lexer, Token};
use crate::source::{Source, SourceReader};

/// An immutable SQL dialect.
#[derive(Debug)]
pub struct Dialect {
    name: String,
    description: String,
    aliases: Vec<String>,
    syntax: Arc<Syntax>,
    entries: BTreeMap<ModelKind, EntryPoint>,
}

impl Dialect {
    /// Starts building a dialect.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DialectBuilder {
        DialectBuilder::new(name)
    }

    /// Returns the canonical name of the dialect.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the other names the dialect is registered under.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the lexical rules and grammar shared by this dialect's analyses.
    #[must_use]
    pub const fn syntax(&self) -> &Arc<Syntax> {
        &self.syntax
    }

    #[must_use]
    pub fn lexical(&self) -> &LexicalRules {
        &self.syntax.lexical
    }

    /// Returns true if the dialect reserves `keyword`.
    #[must_use]
    pub fn reserves(&self, keyword: Keyword) -> bool {
        self.syntax.lexical.keywords.reserves(keyword)
    }

    /// Returns the model kinds this dialect can produce.
    #[must_use]
    pub fn supported_models(&self) -> Vec<ModelKind> {
        self.entries.keys().copied().collect()
    }

    /// Resolves the analysis case producing `M`.
    ///
    /// Fails with `Unsupported` when the dialect has no entry rule for `M`.
    pub fn find_analysis_case<M: StatementModel>(&self) -> Result<AnalysisCase<M>, AnalysisError> {
        let rule = self.entries.get(&M::KIND).and_then(M::entry).ok_or_else(|| {
            AnalysisError::unsupported(format!(
                "dialect {} does not support {} models",
                self.name,
                M::KIND
            ))
        })?;
        debug!(dialect = %self.name, model = %M::KIND, "resolved analysis case");
        Ok(AnalysisCase::new(&self.name, Arc::clone(&self.syntax), rule))
    }

    /// Prepares an analysis of `source` without starting it.
    ///
    /// The case must come from this dialect.
    pub fn prepare_analysis<M: StatementModel>(
        &self,
        source: &Source,
        case: &AnalysisCase<M>,
    ) -> Result<Analysis<M>, AnalysisError> {
        if !Arc::ptr_eq(case.syntax(), &self.syntax) {
            return Err(AnalysisError::unsupported(format!(
                "analysis case belongs to dialect {}, not {}",
                case.dialect(),
                self.name
            )));
        }
        Ok(Analysis::new(source, case.clone()))
    }

    /// Lexes `text` into its full token list, ending with end of input.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(SourceReader::new(text), Arc::clone(&self.syntax.lexical)).tokenize()
    }

    /// Quotes an identifier with the dialect's preferred quote characters.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self
            .syntax
            .lexical
            .identifier_quotes
            .first()
            .copied()
            .unwrap_or(('"', '"'));
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }
}

/// Builder for [`Dialect`].
#[derive(Debug)]
pub struct DialectBuilder {
    name: String,
    description: String,
    aliases: Vec<String>,
    lexical: LexicalRules,
    grammar: GrammarRules,
    entries: Vec<EntryPoint>,
}

impl DialectBuilder {
    /// Creates a builder with standard lexical rules and the base grammar.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            lexical: LexicalRules::default(),
            grammar: GrammarRules::base(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds another name the dialect can be looked up by.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn lexical(mut self, lexical: LexicalRules) -> Self {
        self.lexical = lexical;
        self
    }

    #[must_use]
    pub const fn grammar(mut self, grammar: GrammarRules) -> Self {
        self.grammar = grammar;
        self
    }

    /// Registers an entry rule.
    #[must_use]
    pub fn entry(mut self, entry: EntryPoint) -> Self {
        self.entries.push(entry);
        self
    }

    /// Registers the entry rules of the standard grammar: statements, every
    /// standard statement kind, scripts and expressions.
    #[must_use]
    pub fn standard_entries(self) -> Self {
        self.entry(EntryPoint::Statement(grammar::dialect_statement))
            .entry(EntryPoint::Select(grammar::select_statement))
            .entry(EntryPoint::Insert(grammar::insert_statement))
            .entry(EntryPoint::Update(grammar::update_statement))
            .entry(EntryPoint::Delete(grammar::delete_statement))
            .entry(EntryPoint::CreateTable(grammar::create_table_statement))
            .entry(EntryPoint::Script(grammar::script))
            .entry(EntryPoint::Expression(grammar::expression))
    }

    /// Builds the dialect.
    ///
    /// Fails if two entry rules produce the same model kind.
    pub fn build(self) -> Result<Dialect, DialectError> {
        if self.name.trim().is_empty() {
            return Err(DialectError::EmptyName);
        }

        let mut entries = BTreeMap::new();
        for entry in self.entries {
            if entries.insert(entry.kind(), entry).is_some() {
                return Err(DialectError::DuplicateEntry {
                    dialect: self.name,
                    model: entry.kind(),
                });
            }
        }

        Ok(Dialect {
            name: self.name,
            description: self.description,
            aliases: self.aliases,
            syntax: Arc::new(Syntax::new(self.lexical, self.grammar)),
            entries,
        })
    }
}

/// Dialects by name.
///
/// Lookups are case-insensitive and honour aliases.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: Vec<Dialect>,
    index: HashMap<String, usize>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in dialects.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builders: [fn() -> DialectBuilder; 4] =
            [sql92::dialect, sqlite::dialect, postgres::dialect, mysql::dialect];
        for builder in builders {
            if let Err(err) = builder().build().and_then(|dialect| registry.register(dialect)) {
                error!(error = %err, "skipping built-in dialect");
            }
        }
        registry
    }

    /// Registers a dialect under its name and aliases.
    pub fn register(&mut self, dialect: Dialect) -> Result<(), DialectError> {
        let keys: Vec<String> = core::iter::once(&dialect.name)
            .chain(&dialect.aliases)
            .map(|name| name.to_ascii_lowercase())
            .collect();
        if let Some(taken) = keys.iter().find(|key| self.index.contains_key(*key)) {
            return Err(DialectError::DuplicateName(taken.clone()));
        }

        let slot = self.dialects.len();
        for key in keys {
            self.index.insert(key, slot);
        }
        debug!(dialect = %dialect.name, "registered dialect");
        self.dialects.push(dialect);
        Ok(())
    }

    /// Looks a dialect up by name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dialect> {
        self.index
            .get(&name.to_ascii_lowercase())
            .and_then(|slot| self.dialects.get(*slot))
    }

    /// Returns the canonical names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.dialects.iter().map(Dialect::name).collect()
    }

    /// Iterates over the registered dialects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Dialect> {
        self.dialects.iter()
    }
}

/// Returns the process-wide registry of built-in dialects.
pub fn builtin_registry() -> &'static DialectRegistry {
    static BUILTIN: OnceLock<DialectRegistry> = OnceLock::new();
    BUILTIN.get_or_init(DialectRegistry::builtin)
}

/// Looks up a built-in dialect by name or alias.
pub fn dialect_for(name: &str) -> Result<&'static Dialect, AnalysisError> {
    let dialect = builtin_registry()
        .get(name)
        .ok_or_else(|| AnalysisError::unknown_dialect(name))?;
    debug!(requested = name, dialect = %dialect.name, "dialect lookup");
    Ok(dialect)
}
