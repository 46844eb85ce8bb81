//! Argument parsing for chat commands.
//!
//! Arguments are whitespace separated. Flags start with `-` or `--`; value
//! flags consume the following token, switches do not. Everything else is
//! positional.

use std::collections::HashMap;

use crate::common::error::{CommandError, CommandResult};

/// One accepted flag and its aliases.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    /// Canonical name used for lookups.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub takes_value: bool,
}

impl FlagSpec {
    pub const fn value(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, takes_value: true }
    }

    pub const fn switch(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, takes_value: false }
    }

    fn matches(&self, flag: &str) -> bool {
        self.name == flag || self.aliases.contains(&flag)
    }
}

#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    flags: HashMap<&'static str, Option<String>>,
}

impl ParsedArgs {
    /// Positional arguments joined back with single spaces.
    pub fn joined(&self) -> String {
        self.positional.join(" ")
    }

    pub fn has(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).and_then(|v| v.as_deref())
    }

    /// Parse a value flag, or `None` when it was not given.
    pub fn parse_value<T: std::str::FromStr>(&self, name: &str) -> CommandResult<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        self.value(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| CommandError::InvalidOption {
                    flag: format!("-{}", name),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

fn is_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !token[1..].starts_with(|c: char| c.is_ascii_digit())
}

/// Parse `input` against the accepted flags.
pub fn parse_args(input: &str, specs: &[FlagSpec]) -> CommandResult<ParsedArgs> {
    let mut parsed = ParsedArgs::default();
    let mut tokens = input.split_whitespace();

    while let Some(token) = tokens.next() {
        if !is_flag(token) {
            parsed.positional.push(token.to_string());
            continue;
        }

        let flag = token.trim_start_matches('-');
        let spec = specs.iter().find(|s| s.matches(flag)).ok_or_else(|| {
            CommandError::InvalidOption {
                flag: token.to_string(),
                message: "unknown option".to_string(),
            }
        })?;

        let value = if spec.takes_value {
            let value = tokens.next().ok_or_else(|| CommandError::InvalidOption {
                flag: token.to_string(),
                message: "missing value".to_string(),
            })?;
            Some(value.to_string())
        } else {
            None
        };
        parsed.flags.insert(spec.name, value);
    }

    Ok(parsed)
}
