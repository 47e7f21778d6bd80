//! faqd - Discord driver for the FAQ desk
//!
//! Connects to the gateway and answers every non-bot message through the
//! shared [`FaqService`].

pub mod chunk;
pub mod handler;
pub mod token;

use anyhow::{Context, Result};
use faq_common::{FaqConfig, FaqService};
use serenity::all::{ClientBuilder, GatewayIntents};
use std::sync::Arc;
use tracing::info;

pub use handler::FaqHandler;
pub use token::{load_token, TokenError};

/// Gateway intents the bot subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Load data, connect, and serve until the gateway connection ends.
pub async fn run(config: &FaqConfig) -> Result<()> {
    let service = Arc::new(FaqService::from_config(config)?);
    let token = load_token(&config.discord)?;

    let mut client = ClientBuilder::new(&token, intents())
        .event_handler(FaqHandler::new(service))
        .await
        .context("failed to build discord client")?;

    info!("connecting to discord gateway");
    client.start().await.context("discord client stopped")?;
    Ok(())
}
