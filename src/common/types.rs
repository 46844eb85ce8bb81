//! Shared types used across the application.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::CommandError;

/// Valorant server region (the API calls it "affinity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Region {
    Eu,
    Na,
    Kr,
    #[default]
    Ap,
    Latam,
    Br,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Eu,
        Region::Na,
        Region::Kr,
        Region::Ap,
        Region::Latam,
        Region::Br,
    ];

    /// Wire value used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eu => "eu",
            Self::Na => "na",
            Self::Kr => "kr",
            Self::Ap => "ap",
            Self::Latam => "latam",
            Self::Br => "br",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| format!("unknown region '{}' (use: eu, na, kr, ap, latam, br)", s))
    }
}

impl TryFrom<String> for Region {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A Riot ID, `name#tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub name: String,
    pub tag: String,
}

impl RiotId {
    /// Parse `name#tag`. Names may contain spaces; the tag is everything
    /// after the last `#`.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let (name, tag) = input
            .rsplit_once('#')
            .ok_or_else(|| CommandError::InvalidRiotId(input.to_string()))?;

        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return Err(CommandError::InvalidRiotId(input.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.tag)
    }
}
