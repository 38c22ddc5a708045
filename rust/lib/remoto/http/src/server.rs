//! Server side: mounts service logic on an axum [`Router`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, post};
use remoto_ir::Definition;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::{DispatchError, EndpointKind};
use crate::file::FileResponse;
use crate::{SINGLE_REQUEST_ONLY, endpoint_path};

/// Called for every failure outside service logic with the request's method
/// and path.
pub type ErrorHook = Arc<dyn Fn(&Method, &str, &DispatchError) + Send + Sync>;

/// The default [`ErrorHook`].
pub fn log_error(method: &Method, path: &str, err: &DispatchError) {
    error!(%method, path, error = %err, "remoto request failed");
}

/// A response object: serializable, zero-valued by default, and able to
/// carry an error message in place of its other fields.
pub trait ResponseObject: Serialize + Default + Send + 'static {
    fn error(&self) -> &str;
    fn set_error(&mut self, message: String);
}

/// A registered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub service: String,
    pub method: String,
    pub path: String,
    pub kind: EndpointKind,
}

/// Route table of remoto endpoints.
///
/// Set the error hook at construction; every endpoint registered afterwards
/// reports through it.
pub struct Server {
    router: Router,
    endpoints: Vec<Endpoint>,
    on_error: ErrorHook,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// A server that logs dispatch failures through `tracing`.
    pub fn new() -> Self {
        Self::with_error_hook(Arc::new(log_error))
    }

    pub fn with_error_hook(on_error: ErrorHook) -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
            on_error,
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Mount a batch endpoint. Items are handled one after another, in order;
    /// an item whose handler fails gets a default response carrying the error.
    pub fn register_batch<Req, Resp, E, F, Fut>(
        &mut self,
        service: &str,
        method: &str,
        handler: F,
    ) -> Result<&mut Self, DispatchError>
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: ResponseObject,
        E: fmt::Display + Send + 'static,
        F: Fn(Req) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, E>> + Send + 'static,
    {
        let on_error = self.on_error.clone();
        let route = post(move |http_method: Method, uri: Uri, body: Bytes| {
            let handler = handler.clone();
            let on_error = on_error.clone();
            async move {
                let path = uri.path().to_string();
                match batch(handler, body).await {
                    Ok(response) => response,
                    Err(err) => failed(&on_error, &http_method, &path, err),
                }
            }
        });
        self.add(service, method, EndpointKind::Batch, route)
    }

    /// Mount a file endpoint. Exactly one request is accepted; the file the
    /// handler returns is streamed back as the body.
    pub fn register_file<Req, E, F, Fut>(
        &mut self,
        service: &str,
        method: &str,
        handler: F,
    ) -> Result<&mut Self, DispatchError>
    where
        Req: DeserializeOwned + Send + 'static,
        E: fmt::Display + Send + 'static,
        F: Fn(Req) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<FileResponse, E>> + Send + 'static,
    {
        let on_error = self.on_error.clone();
        let route = post(move |http_method: Method, uri: Uri, body: Bytes| {
            let handler = handler.clone();
            let on_error = on_error.clone();
            async move {
                let path = uri.path().to_string();
                let stream_hook = {
                    let (on_error, method, path) = (on_error.clone(), http_method.clone(), path.clone());
                    move |err: DispatchError| on_error(&method, &path, &err)
                };
                match single_file(handler, body, stream_hook).await {
                    Ok(response) => response,
                    Err(err) => failed(&on_error, &http_method, &path, err),
                }
            }
        });
        self.add(service, method, EndpointKind::File, route)
    }

    fn add(
        &mut self,
        service: &str,
        method: &str,
        kind: EndpointKind,
        route: MethodRouter,
    ) -> Result<&mut Self, DispatchError> {
        let path = endpoint_path(service, method);
        if self.endpoints.iter().any(|e| e.path == path) {
            return Err(DispatchError::Duplicate(path));
        }
        self.router = std::mem::replace(&mut self.router, Router::new()).route(&path, route);
        self.endpoints.push(Endpoint {
            service: service.to_string(),
            method: method.to_string(),
            path,
            kind,
        });
        Ok(self)
    }

    /// Check that every method in `def` is mounted, as the kind it needs.
    pub fn verify(&self, def: &Definition) -> Result<(), DispatchError> {
        for service in &def.services {
            for method in &service.methods {
                let path = endpoint_path(&service.name, &method.name);
                let expected = EndpointKind::of(method);
                match self.endpoints.iter().find(|e| e.path == path) {
                    None => return Err(DispatchError::Unregistered(path)),
                    Some(endpoint) if endpoint.kind != expected => {
                        return Err(DispatchError::KindMismatch {
                            path,
                            expected,
                            found: endpoint.kind,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Log the route table.
    pub fn describe(&self) {
        for endpoint in &self.endpoints {
            info!(path = %endpoint.path, kind = %endpoint.kind, "endpoint");
        }
    }

    /// The finished router. Unknown paths answer `404`.
    pub fn into_router(self) -> Router {
        self.router.fallback(not_found)
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}

fn failed(on_error: &ErrorHook, method: &Method, path: &str, err: DispatchError) -> Response {
    on_error(method, path, &err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

fn json(status: StatusCode, value: &impl Serialize) -> Result<Response, DispatchError> {
    let body = serde_json::to_vec(value).map_err(|e| DispatchError::Encode(e.to_string()))?;
    Ok((status, [(CONTENT_TYPE, "application/json")], body).into_response())
}

fn decode<Req: DeserializeOwned>(body: &[u8]) -> Result<Vec<Req>, DispatchError> {
    serde_json::from_slice(body).map_err(|e| DispatchError::Decode(e.to_string()))
}

async fn batch<Req, Resp, E, F, Fut>(handler: F, body: Bytes) -> Result<Response, DispatchError>
where
    Req: DeserializeOwned,
    Resp: ResponseObject,
    E: fmt::Display,
    F: Fn(Req) -> Fut,
    Fut: Future<Output = Result<Resp, E>>,
{
    let requests: Vec<Req> = decode(&body)?;
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        let response = match handler(request).await {
            Ok(response) => response,
            Err(err) => {
                let mut response = Resp::default();
                response.set_error(err.to_string());
                response
            }
        };
        responses.push(response);
    }
    json(StatusCode::OK, &responses)
}

#[derive(Serialize)]
struct ErrorObject {
    error: String,
}

async fn single_file<Req, E, F, Fut, H>(
    handler: F,
    body: Bytes,
    on_stream_error: H,
) -> Result<Response, DispatchError>
where
    Req: DeserializeOwned,
    E: fmt::Display,
    F: Fn(Req) -> Fut,
    Fut: Future<Output = Result<FileResponse, E>>,
    H: FnMut(DispatchError) + Send + 'static,
{
    let mut requests: Vec<Req> = decode(&body)?;
    let (Some(request), true) = (requests.pop(), requests.is_empty()) else {
        let error = ErrorObject {
            error: SINGLE_REQUEST_ONLY.to_string(),
        };
        return json(StatusCode::BAD_REQUEST, &[error]);
    };

    match handler(request).await {
        Ok(file) => file.into_streaming_response(on_stream_error),
        Err(err) => json(
            StatusCode::OK,
            &[ErrorObject {
                error: err.to_string(),
            }],
        ),
    }
}
