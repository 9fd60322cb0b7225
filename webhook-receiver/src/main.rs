//! Headwind Webhook Receiver - local listener for testing notifications.
//!
//! Binds the configured port, prints a banner, and pretty-prints every
//! webhook it receives until interrupted.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_receiver::{shutdown_signal, Config, ReceiverServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging on stderr; stdout carries the webhook reports
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .init();

    info!("receiver_starting");

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        signature_verification_configured = config.webhook_secret.is_some(),
        "config_loaded"
    );
    let secret = config.webhook_secret.clone();

    // Bind before printing anything: an unavailable port aborts here
    let server = ReceiverServer::bind(config).await?;

    println!("🚀 Webhook test server listening on {}", server.url());
    println!("📝 Set WEBHOOK_URL={} in your environment", server.url());
    match secret.as_deref() {
        Some(secret) if server.verification_enabled() => {
            println!("🔐 Signature verification enabled with secret: {}", secret)
        }
        _ => println!("🔓 Signature verification disabled (WEBHOOK_SECRET is empty)"),
    }
    println!("\nWaiting for notifications...\n");

    server
        .serve(async {
            shutdown_signal().await;
            println!("\n\nShutting down...");
        })
        .await?;

    info!("receiver_shutdown_complete");

    Ok(())
}
