//! Henrik Valorant API integration.

pub mod client;
pub mod types;

pub use client::{HenrikClient, MatchQuery, StatsApi};
pub use types::{Account, LifetimeMatch, MatchDetails, Page};
