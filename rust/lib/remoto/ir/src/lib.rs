//! Remoto Intermediate Representation (IR)
//!
//! Plain data structures produced by the schema parser and consumed by:
//! - code generation templates (via the JSON form)
//! - the HTTP wire runtime (file vs batch endpoints)
//! - snapshot tests (via the textual rendering)
//!
//! Four levels, outermost first:
//! 1. Definition — one package of services
//! 2. Service    — methods + every structure they reference
//! 3. Method     — one request structure, one response structure
//! 4. Structure  — named record of typed fields

pub mod types;
pub mod structure;
pub mod definition;
mod render;

pub use types::*;
pub use structure::*;
pub use definition::*;
