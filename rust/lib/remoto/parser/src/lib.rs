//! Remoto schema parser.
//!
//! Reads a directory of `.remoto` sources (one package of service contracts
//! and records) and produces the [`remoto_ir::Definition`] the generators and
//! the wire runtime work from.
//!
//! ```text
//! sources → lexer → grammar → package scope → services → Definition
//! ```
//!
//! Every failure is a [`Diagnostic`] located in a source file, or a
//! [`ParseError`] about the directory itself. The first failure stops the
//! parse.

mod assemble;
pub mod ast;
pub mod classify;
pub mod comments;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
mod package;
mod service;
mod structure;

pub use assemble::{parse, parse_sources};
pub use diagnostics::{Diagnostic, ParseError, Pos, TIPS, tip_for};

/// File extension of schema sources.
pub const EXTENSION: &str = "remoto";
