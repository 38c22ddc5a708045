use std::net::SocketAddr;

use axum::routing::post;
use remoto_http::{Client, ClientError, FileResponse, ResponseObject, Server};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct EchoRequest {
    text: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct EchoResponse {
    text: String,
    error: String,
}

impl ResponseObject for EchoResponse {
    fn error(&self) -> &str {
        &self.error
    }

    fn set_error(&mut self, message: String) {
        self.error = message;
    }
}

async fn echo(req: EchoRequest) -> Result<EchoResponse, String> {
    if req.text == "boom" {
        return Err("refusing to echo boom".into());
    }
    Ok(EchoResponse {
        text: req.text.to_uppercase(),
        error: String::new(),
    })
}

async fn fetch(req: EchoRequest) -> Result<FileResponse, String> {
    if req.text.is_empty() {
        return Err("nothing to fetch".into());
    }
    let data = req.text.into_bytes();
    let len = data.len() as u64;
    Ok(FileResponse::new("résumé.txt", std::io::Cursor::new(data))
        .with_content_type("text/plain")
        .with_content_length(len))
}

async fn export(req: EchoRequest) -> Result<FileResponse, String> {
    let data = serde_json::to_vec(&req).map_err(|e| e.to_string())?;
    Ok(FileResponse::new("data.json", std::io::Cursor::new(data)).with_content_type("application/json"))
}

async fn serve() -> SocketAddr {
    let mut server = Server::new();
    server.register_batch("Echo", "Shout", echo).unwrap();
    server.register_file("Echo", "Fetch", fetch).unwrap();
    server.register_file("Echo", "Export", export).unwrap();
    // A misbehaving endpoint: always answers with an empty batch.
    let router = server
        .into_router()
        .route("/remoto/Broken.Shout", post(|| async { "[]" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn request(text: &str) -> EchoRequest {
    EchoRequest {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn batch_round_trip() {
    let client = Client::new(format!("http://{}/", serve().await));
    let responses: Vec<EchoResponse> = client
        .call("Echo", "Shout", &[request("hi"), request("boom"), request("yo")])
        .await
        .unwrap();
    let texts: Vec<_> = responses.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["HI", "", "YO"]);
    assert_eq!(responses[1].error, "refusing to echo boom");
}

#[tokio::test]
async fn call_one_surfaces_service_error() {
    let client = Client::new(format!("http://{}", serve().await));
    let ok: EchoResponse = client.call_one("Echo", "Shout", &request("hi")).await.unwrap();
    assert_eq!(ok.text, "HI");

    let err = client
        .call_one::<_, EchoResponse>("Echo", "Shout", &request("boom"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Service(ref m) if m == "refusing to echo boom"));
}

#[tokio::test]
async fn batch_size_mismatch_is_detected() {
    let client = Client::new(format!("http://{}", serve().await));
    let err = client
        .call::<_, EchoResponse>("Broken", "Shout", &[request("a"), request("b")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::BatchMismatch {
            sent: 2,
            received: 0
        }
    ));
}

#[tokio::test]
async fn unknown_endpoint_is_a_server_error() {
    let client = Client::new(format!("http://{}", serve().await));
    let err = client
        .call::<_, EchoResponse>("Echo", "Whisper", &[request("a")])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 404, .. }));
}

#[tokio::test]
async fn download_file() {
    let client = Client::new(format!("http://{}", serve().await));
    let file = client.download("Echo", "Fetch", &request("file body")).await.unwrap();
    assert_eq!(file.filename, "résumé.txt");
    assert_eq!(file.content_type, "text/plain");
    assert_eq!(file.content_length, Some(9));
    assert_eq!(file.bytes().await.unwrap(), b"file body");

    let err = client.download("Echo", "Fetch", &request("")).await.unwrap_err();
    assert!(matches!(err, ClientError::Service(ref m) if m == "nothing to fetch"));
}

#[tokio::test]
async fn download_json_file() {
    let client = Client::new(format!("http://{}", serve().await));
    let file = client.download("Echo", "Export", &request("hi")).await.unwrap();
    assert_eq!(file.filename, "data.json");
    assert_eq!(file.content_type, "application/json");
    let body: serde_json::Value = serde_json::from_slice(&file.bytes().await.unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"text": "hi"}));
}
