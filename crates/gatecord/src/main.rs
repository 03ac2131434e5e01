//! Gatecord bot entry point
//!
//! Run with:
//! ```bash
//! DISCORD_TOKEN=... cargo run -p gatecord
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use gatecord::{Client, ClientConfig};
use gatecord_common::{try_init_tracing_with_config, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so the tracing preset follows APP_ENV
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Client stopped with an error");
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    info!(
        name = %config.app.name,
        env = ?config.app.env,
        intents = config.gateway.intents.bits(),
        compress = config.gateway.compress,
        "Starting gatecord client"
    );

    let client = Client::from_config(&config);

    client.on("ready", |data| async move {
        if let Some(ready) = data.as_ready() {
            info!(
                user = %ready.user.tag(),
                guilds = ready.guilds.len(),
                session_id = %ready.session_id,
                "Ready"
            );
        }
    });

    client.on("message_create", |data| async move {
        if let Some(message) = data.as_message() {
            info!(
                channel_id = %message.channel_id,
                author = %message.author.tag(),
                content = %message.content,
                "Message received"
            );
        }
    });

    client.login().await?;
    info!("Client stopped");
    Ok(())
}
