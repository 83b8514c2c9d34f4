//! Source text and the readers that walk it.

mod reader;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

pub use reader::{Mark, SourceReader};

use crate::analysis::AnalysisError;

/// Immutable SQL text shared by any number of analyses.
///
/// Cloning a `Source` is cheap; the text itself is never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    text: Arc<str>,
}

impl Source {
    /// Creates a source from in-memory text.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    /// Reads the whole of `reader` into a new source.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, AnalysisError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::new(text))
    }

    /// Reads a file into a new source.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text))
    }

    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creates a fresh reader positioned at the start of the text.
    #[must_use]
    pub fn reader(&self) -> SourceReader {
        SourceReader::new(Arc::clone(&self.text))
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
