use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_NAME_SEPARATOR: &str = "_";
const DEFAULT_CORRELATION_CAPACITY: usize = 10_000;
const DEFAULT_CORRELATION_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_DISPATCH_MAX_ATTEMPTS: u32 = 4;
const DEFAULT_DISPATCH_BASE_DELAY_MS: u64 = 500;
const DEFAULT_DISPATCH_MAX_DELAY_MS: u64 = 8_000;

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Guild whose custom emojis are used as origin badges. Plain labels are used
    /// when unset.
    pub emoji_guild_id: Option<u64>,
    /// Replaces whitespace runs when normalizing guild names into emoji names.
    pub name_separator: String,
    /// Messages starting with this prefix are treated as bot commands and not relayed.
    pub command_prefix: Option<String>,
    /// Drop messages authored by any bot or webhook, not only the relay's own account.
    pub ignore_bots: bool,

    pub correlation_capacity: usize,
    pub correlation_ttl: Duration,

    pub dispatch_max_attempts: u32,
    pub dispatch_base_delay: Duration,
    pub dispatch_max_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            emoji_guild_id: parse_optional(&lookup, "WORMHOLE_EMOJI_GUILD_ID")?,
            name_separator: lookup("WORMHOLE_NAME_SEPARATOR")
                .unwrap_or_else(|| DEFAULT_NAME_SEPARATOR.to_string()),
            command_prefix: lookup("WORMHOLE_COMMAND_PREFIX").filter(|p| !p.is_empty()),
            ignore_bots: parse_optional(&lookup, "WORMHOLE_IGNORE_BOTS")?.unwrap_or(true),
            correlation_capacity: parse_optional(&lookup, "CORRELATION_CAPACITY")?
                .unwrap_or(DEFAULT_CORRELATION_CAPACITY),
            correlation_ttl: Duration::from_secs(
                parse_optional(&lookup, "CORRELATION_TTL_SECS")?
                    .unwrap_or(DEFAULT_CORRELATION_TTL_SECS),
            ),
            dispatch_max_attempts: parse_optional(&lookup, "DISPATCH_MAX_ATTEMPTS")?
                .unwrap_or(DEFAULT_DISPATCH_MAX_ATTEMPTS),
            dispatch_base_delay: Duration::from_millis(
                parse_optional(&lookup, "DISPATCH_BASE_DELAY_MS")?
                    .unwrap_or(DEFAULT_DISPATCH_BASE_DELAY_MS),
            ),
            dispatch_max_delay: Duration::from_millis(
                parse_optional(&lookup, "DISPATCH_MAX_DELAY_MS")?
                    .unwrap_or(DEFAULT_DISPATCH_MAX_DELAY_MS),
            ),
        })
    }
}

fn parse_optional<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
    }
}
