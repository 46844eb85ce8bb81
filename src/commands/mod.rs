//! Chat commands (`!val info`, `!val matches`, `!val match`, ...).
//!
//! Commands are transport-agnostic: they talk to the chat through a
//! [`Session`] and to the outside world through [`StatsApi`] and the
//! [`Shortener`]. Every failure is caught in
//! [`CommandHandler::handle_command`] and turned into a reply.

pub mod args;
pub mod format;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::api::{MatchQuery, StatsApi};
use crate::common::error::{ApiError, CommandError, CommandResult};
use crate::common::{Region, RiotId};
use crate::config::Config;
use crate::shortener::Shortener;
use args::{parse_args, FlagSpec};
use format::{split_message, MESSAGE_LIMIT};

/// Largest page size the `matches` command accepts.
const MAX_PAGE_SIZE: u32 = 20;

const INFO_FLAGS: &[FlagSpec] = &[FlagSpec::switch("force", &["f"])];

const MATCHES_FLAGS: &[FlagSpec] = &[
    FlagSpec::value("region", &["r"]),
    FlagSpec::value("page", &["p"]),
    FlagSpec::value("size", &["s"]),
    FlagSpec::value("map", &["m"]),
    FlagSpec::value("mode", &["mo"]),
];

/// The conversation a command was issued in.
#[async_trait]
pub trait Session: Send + Sync {
    /// Platform user id of whoever issued the command.
    fn author_id(&self) -> u64;

    fn author_name(&self) -> &str;

    async fn send(&self, content: &str) -> anyhow::Result<()>;
}

/// Send `text`, split into as many messages as the chat limit requires.
async fn send_long(session: &dyn Session, text: &str) -> anyhow::Result<()> {
    for chunk in split_message(text, MESSAGE_LIMIT) {
        session.send(&chunk).await?;
    }
    Ok(())
}

/// Turn a command failure into the reply the user sees.
fn user_message(error: &CommandError) -> String {
    match error {
        CommandError::Usage(usage) => format!("Usage: `{}`", usage),
        CommandError::InvalidRiotId(_)
        | CommandError::InvalidOption { .. }
        | CommandError::Permission => error.to_string(),
        CommandError::UnknownShortId(token) => format!("No match found for id `{}`.", token),
        CommandError::Api(ApiError::Status { status, message }) => match message {
            Some(message) => format!("Query failed: {} ({})", status, message),
            None => format!("Query failed: {}", status),
        },
        CommandError::Api(e) => format!("Query failed: {}", e),
        CommandError::Store(_) => "Something went wrong, please try again later.".to_string(),
    }
}

pub struct CommandHandler {
    api: Arc<dyn StatsApi>,
    shortener: Arc<Shortener>,
    prefix: String,
    default_region: Region,
    admins: Vec<u64>,
}

impl CommandHandler {
    pub fn new(api: Arc<dyn StatsApi>, shortener: Arc<Shortener>, config: &Config) -> Self {
        Self {
            api,
            shortener,
            prefix: config.discord.prefix.clone(),
            default_region: config.api.region,
            admins: config.discord.admins.clone(),
        }
    }

    /// Parse and execute a command.
    ///
    /// Returns `true` if the message was a command, `false` otherwise. Errors
    /// are only returned when the session itself cannot be written to.
    pub async fn handle_command(&self, session: &dyn Session, content: &str) -> anyhow::Result<bool> {
        let Some(rest) = content.trim().strip_prefix(self.prefix.as_str()) else {
            return Ok(false);
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default().to_lowercase();
        if command != "val" && command != "valorant" {
            return Ok(false);
        }

        let rest = parts.next().unwrap_or_default().trim();
        let mut parts = rest.splitn(2, char::is_whitespace);
        let sub = parts.next().unwrap_or_default().to_lowercase();
        let args = parts.next().unwrap_or_default().trim();

        info!("{}val {} from {} ({})", self.prefix, sub, session.author_name(), session.author_id());
        debug!("Command args: {:?}", args);

        let result = match sub.as_str() {
            "info" => self.handle_info(session, args).await,
            "matches" => self.handle_matches(session, args).await,
            "match" => self.handle_match(session, args).await,
            "cache" => self.handle_cache(session, args).await,
            "" | "help" => self.handle_help(session).await,
            other => Err(CommandError::Usage(format!(
                "{}val help (unknown command '{}')",
                self.prefix, other
            ))),
        };

        if let Err(e) = result {
            match &e {
                CommandError::Api(_) | CommandError::Store(_) => {
                    error!("{}val {} failed: {}", self.prefix, sub, e)
                }
                _ => debug!("{}val {} rejected: {}", self.prefix, sub, e),
            }
            session.send(&user_message(&e)).await?;
        }

        Ok(true)
    }

    /// Tell the user we are working on it. A failed notice is not fatal.
    async fn notify_querying(&self, session: &dyn Session) {
        if let Err(e) = session.send("Querying, please wait...").await {
            warn!("Failed to send progress notice: {}", e);
        }
    }

    async fn handle_info(&self, session: &dyn Session, input: &str) -> CommandResult<()> {
        let args = parse_args(input, INFO_FLAGS)?;
        if args.positional.is_empty() {
            return Err(CommandError::Usage(format!("{}val info <name#tag> [-f]", self.prefix)));
        }
        let id = RiotId::parse(&args.joined())?;

        self.notify_querying(session).await;
        let account = self.api.account(&id, args.has("force")).await?;

        send_reply(session, &format::format_account(&account)).await
    }

    async fn handle_matches(&self, session: &dyn Session, input: &str) -> CommandResult<()> {
        let args = parse_args(input, MATCHES_FLAGS)?;
        if args.positional.is_empty() {
            return Err(CommandError::Usage(format!(
                "{}val matches <name#tag> [-r region] [-p page] [-s size] [-m map] [-mo mode]",
                self.prefix
            )));
        }
        let id = RiotId::parse(&args.joined())?;

        let region = args
            .parse_value::<Region>("region")?
            .unwrap_or(self.default_region);
        let query = MatchQuery {
            page: args.parse_value("page")?.unwrap_or(1),
            size: args.parse_value("size")?.unwrap_or(10),
            map: args.value("map").map(str::to_string),
            mode: args.value("mode").map(str::to_string),
        };
        if query.page == 0 {
            return Err(CommandError::InvalidOption {
                flag: "-p".to_string(),
                message: "pages start at 1".to_string(),
            });
        }
        if query.size == 0 || query.size > MAX_PAGE_SIZE {
            return Err(CommandError::InvalidOption {
                flag: "-s".to_string(),
                message: format!("size must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        self.notify_querying(session).await;
        let page = self.api.lifetime_matches(region, &id, &query).await?;

        let ids: Vec<&str> = page.items.iter().map(|m| m.meta.id.as_str()).collect();
        let short_ids = self.shortener.shorten_many(&ids).await?;

        send_reply(
            session,
            &format::format_match_list(&id, query.page, &page, &short_ids),
        )
        .await
    }

    async fn handle_match(&self, session: &dyn Session, input: &str) -> CommandResult<()> {
        let token = input.split_whitespace().next().ok_or_else(|| {
            CommandError::Usage(format!("{}val match <id>", self.prefix))
        })?;

        let long_id = self
            .shortener
            .resolve_short_id(token)
            .await?
            .ok_or_else(|| CommandError::UnknownShortId(token.to_string()))?;

        self.notify_querying(session).await;
        let details = self.api.match_details(&long_id).await?;

        // A raw UUID gets a short id too, so it can be referenced later.
        let short_ids = self.shortener.shorten_many(&[long_id.as_str()]).await?;
        let label = short_ids.get(&long_id).map(String::as_str);

        send_reply(session, &format::format_match_details(&details, label)).await
    }

    async fn handle_cache(&self, session: &dyn Session, input: &str) -> CommandResult<()> {
        if !self.admins.contains(&session.author_id()) {
            warn!(
                "{} ({}) tried to use cache administration",
                session.author_name(),
                session.author_id()
            );
            return Err(CommandError::Permission);
        }

        let mut parts = input.split_whitespace();
        match parts.next().unwrap_or_default() {
            "stats" => {
                let stats = self.shortener.stats().await?;
                send_reply(
                    session,
                    &format!(
                        "Short ids: {} forward, {} reverse, last assigned #{}",
                        stats.forward_entries, stats.reverse_entries, stats.last_assigned
                    ),
                )
                .await
            }
            "clear" => {
                self.shortener.clear().await?;
                info!("Short id tables cleared by {}", session.author_name());
                send_reply(session, "Short id tables cleared.").await
            }
            "audit" => {
                let long_id = parts.next().ok_or_else(|| {
                    CommandError::Usage(format!("{}val cache audit <match-uuid>", self.prefix))
                })?;
                let report = self.shortener.audit(long_id).await?;
                let verdict = if report.is_consistent() { "consistent" } else { "INCONSISTENT" };
                send_reply(
                    session,
                    &format!(
                        "`{}`: reverse {:?}, forward scan {:?}, forward at reverse {:?} ({})",
                        report.long_id,
                        report.reverse,
                        report.forward_scan,
                        report.forward_at_reverse,
                        verdict
                    ),
                )
                .await
            }
            _ => Err(CommandError::Usage(format!(
                "{}val cache stats|clear|audit <match-uuid>",
                self.prefix
            ))),
        }
    }

    async fn handle_help(&self, session: &dyn Session) -> CommandResult<()> {
        let p = &self.prefix;
        let help_text = format!(
            "**Available Commands:**\n\
             • `{p}val info <name#tag> [-f]` - Account overview (`-f` forces a refresh)\n\
             • `{p}val matches <name#tag> [-r region] [-p page] [-s size] [-m map] [-mo mode]` - Recent matches\n\
             • `{p}val match <id>` - Match details by short id or match UUID\n\
             • `{p}val help` - Show this help message\n\
             Default region: {}",
            self.default_region
        );
        send_reply(session, &help_text).await
    }
}

/// Send a reply; a chat failure here has nowhere else to go, so log it.
async fn send_reply(session: &dyn Session, text: &str) -> CommandResult<()> {
    if let Err(e) = send_long(session, text).await {
        error!("Failed to send reply: {}", e);
    }
    Ok(())
}
