use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use window_relay::ai::OpenAiClient;
use window_relay::models::Config;
use window_relay::server;

#[derive(Debug, Parser)]
#[command(name = "window-relay")]
#[command(about = "Relay photo edits and prompt rewrites to OpenAI")]
struct CliArgs {
    /// Interface to bind; overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on; overrides PORT.
    #[arg(long, short)]
    port: Option<u16>,
}

impl CliArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "window_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    if config.using_default_token {
        warn!("BEARER_TOKEN not set; accepting the development token. Do not run like this in production");
    }
    info!(
        "Tidy model: {}, render model: {}",
        config.tidy_model, config.render_model
    );

    let ai = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.tidy_model.clone(),
        config.openai_base_url.clone(),
    ));

    if let Err(e) = server::serve(&config, ai).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
