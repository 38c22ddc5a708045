use std::fmt;

use thiserror::Error;

/// How an endpoint answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// JSON array in, JSON array out.
    Batch,
    /// One request in, a streamed file out.
    File,
}

impl EndpointKind {
    /// The kind a method of the IR needs.
    pub fn of(method: &remoto_ir::Method) -> Self {
        if method.is_file_endpoint() {
            EndpointKind::File
        } else {
            EndpointKind::Batch
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Batch => write!(f, "batch"),
            EndpointKind::File => write!(f, "file"),
        }
    }
}

/// Failures outside service logic: the wire itself or the route table.
///
/// Service errors never show up here; they travel inside response objects.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("decode request: {0}")]
    Decode(String),

    #[error("encode response: {0}")]
    Encode(String),

    #[error("stream file: {0}")]
    Stream(String),

    #[error("{0}: already registered")]
    Duplicate(String),

    #[error("{0}: not registered")]
    Unregistered(String),

    #[error("{path}: registered as {found} endpoint, definition requires {expected}")]
    KindMismatch {
        path: String,
        expected: EndpointKind,
        found: EndpointKind,
    },
}
