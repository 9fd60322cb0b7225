//! End-to-end tests against a bound receiver over real HTTP.

use std::net::{IpAddr, Ipv4Addr};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use webhook_receiver::{expected_signature, Config, ReceiverServer};

struct Running {
    url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Running {
    async fn stop(self) {
        self.stop.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

async fn start(secret: Option<&str>) -> Running {
    let config = Config {
        bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        webhook_secret: secret.map(str::to_string),
    };
    let server = ReceiverServer::bind(config).await.unwrap();
    let url = server.url();
    let (stop, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server.serve(async move {
        let _ = rx.await;
    }));

    Running { url, stop, handle }
}

async fn post(url: &str, body: &'static [u8], signature: Option<&str>) -> (u16, String, String) {
    let client = reqwest::Client::new();
    let mut request = client.post(url).body(body);
    if let Some(sig) = signature {
        request = request.header("X-Headwind-Signature", sig);
    }

    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (status, content_type, response.text().await.unwrap())
}

#[tokio::test]
async fn test_deployment_notification_acknowledged() {
    let server = start(Some("test-secret-key")).await;
    let body: &'static [u8] = br#"{"event":"deploy","deployment":{"namespace":"prod","name":"api","currentImage":"v1","newImage":"v2"}}"#;

    let (status, content_type, text) = post(&server.url, body, None).await;
    assert_eq!(status, 200);
    assert_eq!(content_type, "application/json");
    assert_eq!(text, r#"{"status": "ok"}"#);

    server.stop().await;
}

#[tokio::test]
async fn test_signed_and_mis_signed_deliveries_acknowledged() {
    let server = start(Some("test-secret-key")).await;
    let body: &'static [u8] = br#"{"event":"deploy"}"#;
    let good = expected_signature("test-secret-key", body);

    for sig in [good.as_str(), "sha256=bogus"] {
        let (status, _, text) = post(&server.url, body, Some(sig)).await;
        assert_eq!(status, 200);
        assert_eq!(text, r#"{"status": "ok"}"#);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_server_survives_bad_bodies() {
    let server = start(None).await;

    let bodies: [&'static [u8]; 3] = [b"hello world", &[0xff, 0x00, 0xfe], b"{\"event\":"];
    for body in bodies {
        let (status, _, text) = post(&server.url, body, Some("sha256=abc")).await;
        assert_eq!(status, 200);
        assert_eq!(text, r#"{"status": "ok"}"#);
    }

    // Still serving afterwards
    let (status, _, _) = post(&format!("{}/any/path", server.url), b"{}", None).await;
    assert_eq!(status, 200);

    server.stop().await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start(None).await;

    let response = reqwest::get(format!("{}/health", server.url)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"status":"ok"}"#);

    server.stop().await;
}
