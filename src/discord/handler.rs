//! Discord message handling.
//!
//! Adapts serenity messages to the transport-agnostic [`Session`] and runs
//! each command on its own task, so slow API calls do not hold up other
//! users.

use std::sync::Arc;

use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::prelude::*;
use tracing::error;

use crate::commands::{CommandHandler, Session};

/// The channel a command came from, plus who sent it.
pub struct ChannelSession {
    http: Arc<Http>,
    channel_id: ChannelId,
    author_id: u64,
    author_name: String,
}

impl ChannelSession {
    pub fn from_message(http: Arc<Http>, msg: &Message) -> Self {
        Self {
            http,
            channel_id: msg.channel_id,
            author_id: msg.author.id.get(),
            author_name: msg.author.name.clone(),
        }
    }
}

#[async_trait]
impl Session for ChannelSession {
    fn author_id(&self) -> u64 {
        self.author_id
    }

    fn author_name(&self) -> &str {
        &self.author_name
    }

    async fn send(&self, content: &str) -> anyhow::Result<()> {
        self.channel_id.say(&self.http, content).await?;
        Ok(())
    }
}

/// Whether a message should be looked at at all.
fn is_candidate(content: &str, from_bot: bool, from_self: bool) -> bool {
    !from_bot && !from_self && !content.trim().is_empty() && content.len() <= 500
}

/// Spawn a task running the command in `msg`, if any.
pub fn handle_message(commands: Arc<CommandHandler>, ctx: Context, msg: Message) {
    let from_self = msg.author.id == ctx.cache.current_user().id;
    if !is_candidate(&msg.content, msg.author.bot, from_self) {
        return;
    }

    tokio::spawn(async move {
        let session = ChannelSession::from_message(ctx.http.clone(), &msg);
        if let Err(e) = commands.handle_command(&session, &msg.content).await {
            error!("Command handler error: {}", e);
        }
    });
}
