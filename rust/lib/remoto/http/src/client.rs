//! Calling side over reqwest.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderName};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::endpoint_path;
use crate::file::unquote_ascii;
use crate::server::ResponseObject;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    /// The server broke the one-response-per-request rule.
    #[error("sent {sent} requests, received {received} responses")]
    BatchMismatch { sent: usize, received: usize },

    /// The service logic reported an error for the item.
    #[error("{0}")]
    Service(String),
}

/// A file returned by a file endpoint. The body has not been read yet.
#[derive(Debug)]
pub struct FileDownload {
    pub filename: String,
    pub content_type: String,
    pub content_length: Option<u64>,
    pub response: reqwest::Response,
}

impl FileDownload {
    /// Read the whole body.
    pub async fn bytes(self) -> Result<Vec<u8>, ClientError> {
        Ok(self.response.bytes().await?.to_vec())
    }
}

/// Error item of a file endpoint that did not send a file.
#[derive(serde::Deserialize)]
struct ErrorObject {
    #[serde(default)]
    error: String,
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, service: &str, method: &str) -> String {
        format!("{}{}", self.base_url, endpoint_path(service, method))
    }

    async fn post<Req: Serialize>(
        &self,
        service: &str,
        method: &str,
        requests: &[Req],
    ) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .http
            .post(self.url(service, method))
            .json(requests)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: code,
                message,
            });
        }
        Ok(resp)
    }

    /// Send a batch. The responses come back in request order; per-item
    /// errors are left in the response objects.
    pub async fn call<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        requests: &[Req],
    ) -> Result<Vec<Resp>, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let resp = self.post(service, method, requests).await?;
        let responses: Vec<Resp> = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("response body: {}", e)))?;
        if responses.len() != requests.len() {
            return Err(ClientError::BatchMismatch {
                sent: requests.len(),
                received: responses.len(),
            });
        }
        Ok(responses)
    }

    /// Send one request; a response carrying an error becomes
    /// [`ClientError::Service`].
    pub async fn call_one<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: ResponseObject + DeserializeOwned,
    {
        let mut responses: Vec<Resp> = self
            .call(service, method, std::slice::from_ref(request))
            .await?;
        let response = responses.pop().ok_or(ClientError::BatchMismatch {
            sent: 1,
            received: 0,
        })?;
        if !response.error().is_empty() {
            return Err(ClientError::Service(response.error().to_string()));
        }
        Ok(response)
    }

    /// Call a file endpoint.
    pub async fn download<Req: Serialize>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<FileDownload, ClientError> {
        let resp = self
            .post(service, method, std::slice::from_ref(request))
            .await?;
        let header = |name: HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE).unwrap_or_default();
        let disposition = header(CONTENT_DISPOSITION);
        let content_length = header(CONTENT_LENGTH).and_then(|v| v.parse().ok());

        // Only a file carries a disposition; without one the body is the
        // JSON error array.
        let Some(disposition) = disposition else {
            let errors: Vec<ErrorObject> = resp
                .json()
                .await
                .map_err(|e| ClientError::Decode(format!("response body: {}", e)))?;
            let message = errors.into_iter().next().map(|e| e.error).unwrap_or_default();
            return Err(ClientError::Service(message));
        };

        let filename = disposition
            .strip_prefix("attachment; filename=")
            .and_then(unquote_ascii)
            .unwrap_or_default();
        Ok(FileDownload {
            filename,
            content_type,
            content_length,
            response: resp,
        })
    }
}
