//! Discord bot integration.
//!
//! This module connects the command layer to Discord.

pub mod client;
pub mod handler;

// Re-export main types for external use
pub use client::DiscordBotBuilder;
