//! Remoto wire runtime over HTTP.
//!
//! Every method of a service is one endpoint at `POST /remoto/<Service>.<Method>`.
//!
//! - **Batch endpoints** take a JSON array of N request objects and answer
//!   with a JSON array of exactly N response objects, in order. A failing
//!   item only sets that item's `error`; its siblings still run.
//! - **File endpoints** (the response's only field is a file) take a batch
//!   of exactly one request and stream the file back as the raw body.
//!
//! [`Server`] mounts handlers on an axum router; [`Client`] is the calling
//! side over reqwest.

mod client;
mod error;
mod file;
mod server;

pub use client::{Client, ClientError, FileDownload};
pub use error::{DispatchError, EndpointKind};
pub use file::{FileResponse, quote_ascii, unquote_ascii};
pub use server::{Endpoint, ErrorHook, ResponseObject, Server, log_error};

/// Path prefix shared by all endpoints.
pub const PREFIX: &str = "/remoto";

/// Body sent when a file endpoint receives a batch that is not exactly one
/// request.
pub const SINGLE_REQUEST_ONLY: &str = "only single requests supported for file response endpoints";

/// `/remoto/<Service>.<Method>`
pub fn endpoint_path(service: &str, method: &str) -> String {
    format!("{}/{}.{}", PREFIX, service, method)
}
