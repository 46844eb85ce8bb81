//! Henrik API response records.
//!
//! Each endpoint gets an explicit record. Fields the API may omit or send
//! as `null` are `Option`; everything else is required and a missing value
//! fails decoding. Fields nothing renders yet are kept to pin the response
//! shape; their records carry `allow(dead_code)`.

use serde::Deserialize;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: T,
    #[serde(default)]
    pub results: Option<ResultsMeta>,
}

/// Paging information on list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[allow(dead_code)]
pub struct ResultsMeta {
    pub total: u32,
    pub returned: u32,
    #[serde(default)]
    pub before: u32,
    #[serde(default)]
    pub after: u32,
}

/// A list endpoint's items together with its paging information.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub results: Option<ResultsMeta>,
}

/// Error body returned alongside non-200 statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorItem {
    pub message: String,
}

// ============================================================
// v1/account
// ============================================================

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Account {
    pub puuid: String,
    pub region: String,
    pub account_level: u32,
    pub name: String,
    pub tag: String,
    pub card: Card,
    pub last_update: String,
    /// Unix seconds.
    pub last_update_raw: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Card {
    pub id: String,
    pub small: String,
    pub large: String,
    pub wide: String,
}

// ============================================================
// v1/lifetime/matches
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LifetimeMatch {
    pub meta: MatchMeta,
    pub stats: PlayerMatchStats,
    pub teams: TeamScores,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct MatchMeta {
    pub id: String,
    pub map: NamedRef,
    pub mode: String,
    /// ISO-8601 timestamp.
    pub started_at: String,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Season {
    pub id: String,
    pub short: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct PlayerMatchStats {
    pub puuid: String,
    pub team: String,
    pub level: u32,
    pub character: NamedRef,
    pub tier: u32,
    pub score: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub shots: Shots,
    pub damage: Damage,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Shots {
    pub head: u32,
    pub body: u32,
    pub leg: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[allow(dead_code)]
pub struct Damage {
    pub made: u64,
    pub received: u64,
}

/// Rounds won per side. Both are `null` in free-for-all modes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TeamScores {
    #[serde(default)]
    pub red: Option<u32>,
    #[serde(default)]
    pub blue: Option<u32>,
}

// ============================================================
// v2/match
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MatchDetails {
    pub metadata: MatchMetadata,
    pub players: MatchPlayers,
    #[serde(default)]
    pub teams: Option<MatchTeams>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct MatchMetadata {
    pub matchid: String,
    pub map: String,
    pub mode: String,
    /// Seconds.
    pub game_length: u64,
    pub game_start_patched: String,
    pub rounds_played: u32,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchPlayers {
    pub all_players: Vec<MatchPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct MatchPlayer {
    pub puuid: String,
    pub name: String,
    pub tag: String,
    pub team: String,
    pub character: String,
    #[serde(default)]
    pub currenttier_patched: Option<String>,
    pub stats: MatchPlayerStats,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchPlayerStats {
    pub score: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshots: u32,
    pub bodyshots: u32,
    pub legshots: u32,
}

impl MatchPlayerStats {
    pub fn shots(&self) -> Shots {
        Shots {
            head: self.headshots,
            body: self.bodyshots,
            leg: self.legshots,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchTeams {
    #[serde(default)]
    pub red: Option<TeamResult>,
    #[serde(default)]
    pub blue: Option<TeamResult>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[allow(dead_code)]
pub struct TeamResult {
    #[serde(default)]
    pub has_won: Option<bool>,
    #[serde(default)]
    pub rounds_won: Option<u32>,
    #[serde(default)]
    pub rounds_lost: Option<u32>,
}

impl MatchTeams {
    /// Rounds won per side, in the shape the lifetime endpoint uses.
    pub fn scores(&self) -> TeamScores {
        TeamScores {
            red: self.red.and_then(|t| t.rounds_won),
            blue: self.blue.and_then(|t| t.rounds_won),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const ACCOUNT_JSON: &str = r#"{
        "status": 200,
        "data": {
            "puuid": "54942ced-1967-5f66-8a16-1e0dae875641",
            "region": "ap",
            "account_level": 187,
            "name": "Sova Main",
            "tag": "0001",
            "card": {
                "small": "https://media.valorant-api.com/playercards/x/smallart.png",
                "large": "https://media.valorant-api.com/playercards/x/largeart.png",
                "wide": "https://media.valorant-api.com/playercards/x/wideart.png",
                "id": "x"
            },
            "last_update": "2 minutes ago",
            "last_update_raw": 1700000000
        }
    }"#;

    pub const LIFETIME_MATCHES_JSON: &str = r#"{
        "status": 200,
        "results": { "total": 40, "returned": 2, "before": 0, "after": 38 },
        "data": [
            {
                "meta": {
                    "id": "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
                    "map": { "id": "m-ascent", "name": "Ascent" },
                    "version": "release-07.09",
                    "mode": "Competitive",
                    "started_at": "2023-11-14T22:13:20.000Z",
                    "season": { "id": "s1", "short": "e7a3" },
                    "region": "ap",
                    "cluster": "Tokyo"
                },
                "stats": {
                    "puuid": "54942ced-1967-5f66-8a16-1e0dae875641",
                    "team": "Red",
                    "level": 187,
                    "character": { "id": "c-sova", "name": "Sova" },
                    "tier": 18,
                    "score": 5120,
                    "kills": 21,
                    "deaths": 14,
                    "assists": 9,
                    "shots": { "head": 25, "body": 60, "leg": 15 },
                    "damage": { "made": 3500, "received": 2800 }
                },
                "teams": { "red": 13, "blue": 9 }
            },
            {
                "meta": {
                    "id": "b2c3d4e5-f6a7-4b8c-9d0e-1f2a3b4c5d6e",
                    "map": { "id": "m-bind", "name": "Bind" },
                    "version": "release-07.09",
                    "mode": "Deathmatch",
                    "started_at": "2023-11-14T20:00:00.000Z",
                    "season": { "id": "s1", "short": "e7a3" }
                },
                "stats": {
                    "puuid": "54942ced-1967-5f66-8a16-1e0dae875641",
                    "team": "Red",
                    "level": 187,
                    "character": { "id": "c-sova", "name": "Sova" },
                    "tier": 0,
                    "score": 0,
                    "kills": 30,
                    "deaths": 20,
                    "assists": 0,
                    "shots": { "head": 0, "body": 0, "leg": 0 },
                    "damage": { "made": 0, "received": 0 }
                },
                "teams": { "red": null, "blue": null }
            }
        ]
    }"#;

    pub const MATCH_JSON: &str = r#"{
        "status": 200,
        "data": {
            "metadata": {
                "map": "Ascent",
                "game_version": "release-07.09",
                "game_length": 2280,
                "game_start": 1700000000,
                "game_start_patched": "Tuesday, November 14, 2023 10:13 PM",
                "rounds_played": 22,
                "mode": "Competitive",
                "matchid": "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
                "region": "ap",
                "cluster": "Tokyo"
            },
            "players": {
                "all_players": [
                    {
                        "puuid": "p1",
                        "name": "Sova Main",
                        "tag": "0001",
                        "team": "Red",
                        "character": "Sova",
                        "currenttier_patched": "Diamond 1",
                        "stats": { "score": 5120, "kills": 21, "deaths": 14, "assists": 9,
                                   "bodyshots": 60, "headshots": 25, "legshots": 15 }
                    },
                    {
                        "puuid": "p2",
                        "name": "Jett Diff",
                        "tag": "EUW",
                        "team": "Blue",
                        "character": "Jett",
                        "currenttier_patched": null,
                        "stats": { "score": 4300, "kills": 18, "deaths": 17, "assists": 2,
                                   "bodyshots": 40, "headshots": 10, "legshots": 0 }
                    }
                ]
            },
            "teams": {
                "red": { "has_won": true, "rounds_won": 13, "rounds_lost": 9 },
                "blue": { "has_won": false, "rounds_won": 9, "rounds_lost": 13 }
            }
        }
    }"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_decode_account() {
        let envelope: Envelope<Account> = serde_json::from_str(ACCOUNT_JSON).unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data.name, "Sova Main");
        assert_eq!(envelope.data.account_level, 187);
        assert!(envelope.results.is_none());
    }

    #[test]
    fn test_decode_lifetime_matches_with_null_teams() {
        let envelope: Envelope<Vec<LifetimeMatch>> =
            serde_json::from_str(LIFETIME_MATCHES_JSON).unwrap();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].teams.red, Some(13));
        assert!(envelope.data[1].teams.red.is_none());
        assert!(envelope.data[1].meta.cluster.is_none());
        assert_eq!(envelope.results.unwrap().total, 40);
    }

    #[test]
    fn test_decode_match_details() {
        let envelope: Envelope<MatchDetails> = serde_json::from_str(MATCH_JSON).unwrap();
        let details = envelope.data;

        assert_eq!(details.metadata.rounds_played, 22);
        assert_eq!(details.players.all_players.len(), 2);
        assert!(details.players.all_players[1].currenttier_patched.is_none());

        let scores = details.teams.unwrap().scores();
        assert_eq!((scores.red, scores.blue), (Some(13), Some(9)));
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let json = r#"{ "status": 200, "data": { "name": "x", "tag": "y" } }"#;
        let result: Result<Envelope<Account>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
