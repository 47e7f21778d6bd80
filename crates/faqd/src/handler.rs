//! Discord gateway event handler.
//!
//! Each message author is one conversation; the service keeps their pending
//! menu between messages.

use crate::chunk::{split_message, DISCORD_MESSAGE_LIMIT};
use faq_common::{ConversationId, FaqService, TurnResponse};
use serenity::all::{Context, EventHandler, Message, Ready};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct FaqHandler {
    service: Arc<FaqService>,
}

impl FaqHandler {
    pub fn new(service: Arc<FaqService>) -> Self {
        Self { service }
    }

    /// Run one turn for a message. `None` when the message should be ignored.
    pub fn respond(&self, author_id: u64, is_bot: bool, content: &str) -> Option<TurnResponse> {
        if is_bot || content.trim().is_empty() {
            return None;
        }
        let conversation = ConversationId::new(author_id.to_string());
        let response = self.service.handle_turn(&conversation, content);
        if response.terminate {
            debug!(%conversation, "user said goodbye");
        }
        Some(response)
    }
}

/// Messages to send for one reply.
pub fn outgoing(response: &TurnResponse) -> Vec<String> {
    split_message(&response.text(), DISCORD_MESSAGE_LIMIT)
}

#[serenity::async_trait]
impl EventHandler for FaqHandler {
    async fn message(&self, ctx: Context, new_message: Message) {
        let Some(response) = self.respond(
            new_message.author.id.get(),
            new_message.author.bot,
            &new_message.content,
        ) else {
            return;
        };

        for chunk in outgoing(&response) {
            if let Err(e) = new_message.channel_id.say(&ctx.http, chunk).await {
                error!("failed to send reply to channel {}: {}", new_message.channel_id, e);
                return;
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("logged on as {}", ready.user.name);
    }
}
