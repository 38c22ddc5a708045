//! Positional diagnostics and the common-mistake tip table.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A position inside one of the parsed sources.
///
/// `file` indexes the source list handed to the parser. `line` and `column`
/// are 1-based; columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub file: usize,
    pub line: u32,
    pub column: u32,
}

/// A located error: `<file>:<line>:<column>: <message>[: <tip>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub tip: Option<&'static str>,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: pos.line,
            column: pos.column,
            message: message.into(),
            tip: None,
        }
    }

    /// `<file>:<line>:<column>`
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    /// Attach the first tip whose needle occurs in the rendered diagnostic.
    pub fn with_tip(mut self) -> Self {
        if self.tip.is_none() {
            let rendered = format!("{}: {}", self.location(), self.message);
            self.tip = tip_for(&rendered);
        }
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)?;
        if let Some(tip) = self.tip {
            write!(f, ": {}", tip)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Everything that can make `parse` fail.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no packages found")]
    NoPackages,

    #[error("multiple packages found: {}", .0.join(", "))]
    MultiplePackages(Vec<String>),

    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),
}

/// Common mistakes: a needle found in an error message and the advice to
/// append when it matches. Needles are padded with spaces so they only
/// match whole type names.
pub const TIPS: [(&str, &str); 4] = [
    (" int32 ", "use int"),
    (" int64 ", "use int"),
    (" float32 ", "use float64"),
    (" time.Time ", "use string"),
];

/// The tip for `message`, if any.
pub fn tip_for(message: &str) -> Option<&'static str> {
    TIPS.iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, tip)| *tip)
}
