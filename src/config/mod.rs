
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::types::{DevexRate, MarketplaceCut, UserId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String
    },
    #[error("Invalid entry '{0}' in PROFIT_RADAR_TOKENS, expected token=user-uuid")]
    InvalidToken(String)
}

impl ConfigError {
    pub fn invalid_value(key: &str, value: &str, reason: impl Display) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string()
        }
    }
}

/// Runtime settings, read from `PROFIT_RADAR_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub devex_rate: DevexRate,
    pub marketplace_cut: MarketplaceCut,
    pub tokens: HashMap<String, UserId>,
    pub admin_token: Option<String>,
    pub auth_cache_ttl: Duration,
    pub early_bird_seats: u32,
    pub require_subscription: bool,
    pub local_user: UserId,
    /// Largest request body the HTTP API will buffer.
    pub max_body_bytes: usize
}

impl Config {
    /// Loads a `.env` file when one exists, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tokens = match lookup("PROFIT_RADAR_TOKENS") {
            Some(entries) => parse_tokens(&entries)?,
            None => HashMap::new()
        };

        Ok(Self {
            host: try_load(&lookup, "PROFIT_RADAR_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PROFIT_RADAR_PORT", "8080")?,
            devex_rate: try_load(&lookup, "PROFIT_RADAR_DEVEX_RATE", "0.0035")?,
            marketplace_cut: try_load(&lookup, "PROFIT_RADAR_MARKETPLACE_CUT", "0.30")?,
            tokens,
            admin_token: lookup("PROFIT_RADAR_ADMIN_TOKEN").filter(|token| !token.trim().is_empty()),
            auth_cache_ttl: Duration::from_secs(try_load(&lookup, "PROFIT_RADAR_AUTH_CACHE_SECONDS", "300")?),
            early_bird_seats: try_load(&lookup, "PROFIT_RADAR_EARLY_BIRD_SEATS", "100")?,
            require_subscription: try_load(&lookup, "PROFIT_RADAR_REQUIRE_SUBSCRIPTION", "false")?,
            local_user: try_load(&lookup, "PROFIT_RADAR_LOCAL_USER", "00000000-0000-0000-0000-000000000000")?,
            max_body_bytes: try_load(&lookup, "PROFIT_RADAR_MAX_BODY_BYTES", "16777216")?
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|error| ConfigError::invalid_value(key, &value, error))
}

/// Parses `token=user-uuid` pairs separated by commas.
fn parse_tokens(entries: &str) -> Result<HashMap<String, UserId>, ConfigError> {
    entries.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (token, user) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidToken(entry.to_string()))?;
            let user_id = Uuid::parse_str(user.trim()).map_err(|_| ConfigError::InvalidToken(entry.to_string()))?;

            Ok((token.trim().to_string(), user_id))
        })
        .collect()
}
