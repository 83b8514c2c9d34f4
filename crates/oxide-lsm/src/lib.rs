//! # oxide-lsm
//!
//! Multi-dialect SQL lexical and syntax analysis.
//!
//! This crate provides:
//! - A repositionable source reader and a lazy, dialect-aware lexer
//! - A backtracking grammar engine with per-dialect rule tables
//! - A typed statement model where every node carries its source span
//! - Asynchronous, cancellable analyses run on a tokio worker pool
//!
//! ## Parsing on the calling thread
//!
//! ```rust
//! use oxide_lsm::ast::SelectStatement;
//! use oxide_lsm::dialect::dialect_for;
//!
//! let dialect = dialect_for("sql92").unwrap();
//! let case = dialect.find_analysis_case::<SelectStatement>().unwrap();
//! let select = case.parse(&"SELECT a, b FROM t1 x, t2 y".into()).unwrap();
//!
//! let tables: Vec<_> = select.table_refs().iter().map(|t| t.alias()).collect();
//! assert_eq!(tables, vec![Some("x"), Some("y")]);
//! ```
//!
//! ## Background analyses
//!
//! ```rust
//! use std::time::Duration;
//!
//! use oxide_lsm::analysis::{Scheduler, SchedulerConfig};
//! use oxide_lsm::ast::Statement;
//! use oxide_lsm::dialect::dialect_for;
//! use oxide_lsm::source::Source;
//!
//! let scheduler = Scheduler::new(SchedulerConfig::default()).unwrap();
//! let dialect = dialect_for("sqlite").unwrap();
//! let case = dialect.find_analysis_case::<Statement>().unwrap();
//!
//! let source = Source::from("UPDATE users SET active = 0 WHERE id = ?");
//! let mut analysis = dialect.prepare_analysis(&source, &case).unwrap();
//! let handle = analysis.start(&scheduler);
//!
//! let statement = handle.wait(Some(Duration::from_secs(5))).unwrap().unwrap();
//! assert!(matches!(*statement, Statement::Update(_)));
//! ```

pub mod analysis;
pub mod ast;
pub mod dialect;
pub mod grammar;
pub mod lexer;
pub mod source;

pub use analysis::{
    Analysis, AnalysisCase, AnalysisError, AnalysisErrorKind, AnalysisHandle, AnalysisOutcome,
    Scheduler, SchedulerConfig,
};
pub use ast::{Expr, Statement};
pub use dialect::{dialect_for, Dialect, DialectRegistry, ModelKind, StatementModel};
pub use lexer::{Lexer, Token, TokenKind};
pub use source::{Source, SourceReader};
