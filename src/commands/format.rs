//! Chat rendering for API results.
//!
//! Output is Discord Markdown. Long results are split with
//! [`split_message`] before sending.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::api::types::{MatchPlayer, Shots, TeamScores};
use crate::api::{Account, LifetimeMatch, MatchDetails, Page};
use crate::common::RiotId;

/// Discord's per-message character limit.
pub const MESSAGE_LIMIT: usize = 2000;

/// `Red R : B Blue`, with a missing side shown as 0.
pub fn display_team_scores(scores: TeamScores) -> String {
    format!(
        "Red {} : {} Blue",
        scores.red.unwrap_or(0),
        scores.blue.unwrap_or(0)
    )
}

/// Share of hits that landed on the head, rounded to a whole percent.
pub fn headshot_percentage(shots: Shots) -> u32 {
    let total = shots.head + shots.body + shots.leg;
    if total == 0 {
        return 0;
    }
    (f64::from(shots.head) * 100.0 / f64::from(total)).round() as u32
}

fn format_unix(seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

fn format_iso(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

pub fn format_account(account: &Account) -> String {
    let updated = format_unix(account.last_update_raw).unwrap_or_else(|| account.last_update.clone());

    format!(
        "**{}#{}**\nRegion: {}\nAccount level: {}\nLast API update: {}\n{}",
        account.name,
        account.tag,
        account.region.to_uppercase(),
        account.account_level,
        updated,
        account.card.small,
    )
}

/// One line per match, each prefixed with its short id.
pub fn format_match_list(
    id: &RiotId,
    page_number: u32,
    page: &Page<LifetimeMatch>,
    short_ids: &HashMap<String, String>,
) -> String {
    if page.items.is_empty() {
        return format!("No matches found for **{}** on page {}.", id, page_number);
    }

    let mut out = format!("**Recent matches for {}** (page {}", id, page_number);
    if let Some(results) = page.results {
        out.push_str(&format!(", {} of {}", results.returned, results.total));
    }
    out.push_str(")\n");

    for m in &page.items {
        let short = short_ids
            .get(&m.meta.id)
            .map(String::as_str)
            .unwrap_or("?");
        let stats = &m.stats;

        out.push_str(&format!(
            "`#{}` {} · {} · {} · {}/{}/{} · HS {}%",
            short,
            m.meta.map.name,
            m.meta.mode,
            stats.character.name,
            stats.kills,
            stats.deaths,
            stats.assists,
            headshot_percentage(stats.shots),
        ));
        if m.teams.red.is_some() || m.teams.blue.is_some() {
            out.push_str(&format!(" · {}", display_team_scores(m.teams)));
        }
        out.push_str(&format!(" · {}\n", format_iso(&m.meta.started_at)));
    }

    out.push_str("Use `val match <id>` for details.");
    out
}

fn format_player(player: &MatchPlayer) -> String {
    let stats = &player.stats;
    let mut line = format!(
        "{}#{} ({}) {}/{}/{} · ACS-score {} · HS {}%",
        player.name,
        player.tag,
        player.character,
        stats.kills,
        stats.deaths,
        stats.assists,
        stats.score,
        headshot_percentage(stats.shots()),
    );
    if let Some(ref tier) = player.currenttier_patched {
        line.push_str(&format!(" · {}", tier));
    }
    line
}

pub fn format_match_details(details: &MatchDetails, short_id: Option<&str>) -> String {
    let meta = &details.metadata;

    let mut out = String::new();
    match short_id {
        Some(short) => out.push_str(&format!("**Match #{}** ", short)),
        None => out.push_str("**Match** "),
    }
    out.push_str(&format!(
        "{} · {} · {} min · {}\n",
        meta.map,
        meta.mode,
        meta.game_length / 60,
        meta.game_start_patched
    ));

    if let Some(ref teams) = details.teams {
        out.push_str(&format!(
            "{} ({} rounds)\n",
            display_team_scores(teams.scores()),
            meta.rounds_played
        ));
    }

    let mut players: Vec<&MatchPlayer> = details.players.all_players.iter().collect();
    players.sort_by(|a, b| a.team.cmp(&b.team).then(b.stats.score.cmp(&a.stats.score)));

    let mut current_team: Option<&str> = None;
    for player in players {
        if current_team != Some(player.team.as_str()) {
            out.push_str(&format!("__{}__\n", player.team));
            current_team = Some(player.team.as_str());
        }
        out.push_str(&format!("- {}\n", format_player(player)));
    }

    out.push_str(&format!("`{}`", meta.matchid));
    out
}

/// Split `text` into chunks of at most `limit` characters, preferring line
/// breaks.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if current.chars().count() + line.chars().count() > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if line.chars().count() > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                let piece: String = piece.iter().collect();
                if piece.chars().count() == limit {
                    chunks.push(piece);
                } else {
                    current = piece;
                }
            }
        } else {
            current.push_str(line);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
