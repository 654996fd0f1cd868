use std::fs;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::GameError;
use crate::seat::Chips;

/// Env var naming a TOML file with table defaults.
pub const CONFIG_PATH_ENV: &str = "HOLDEM_ENGINE_CONFIG";
pub const SMALL_BLIND_ENV: &str = "HOLDEM_SMALL_BLIND";
pub const BIG_BLIND_ENV: &str = "HOLDEM_BIG_BLIND";
pub const MAX_PLAYERS_ENV: &str = "HOLDEM_MAX_PLAYERS";
pub const SEED_ENV: &str = "HOLDEM_SEED";

/// Hard ceiling on seats: 10 players use 20 hole cards, 5 board cards and 3
/// burns out of 52.
pub const MAX_SEATS: usize = 10;

/// Stakes and table size for one hand. Immutable once the hand starts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub max_players: usize,
    /// Fixed deck seed for reproducible tables; `None` draws a fresh seed per hand.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            small_blind: 100,
            big_blind: 200,
            max_players: 9,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new(small_blind: Chips, big_blind: Chips, max_players: usize) -> Self {
        Self {
            small_blind,
            big_blind,
            max_players,
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(GameError::InvalidConfig("blinds must be >0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if !(2..=MAX_SEATS).contains(&self.max_players) {
            return Err(GameError::InvalidConfig(format!(
                "max_players must be within 2..={MAX_SEATS}"
            )));
        }
        Ok(())
    }

    /// Deck seed for `hand_id` when the table is seeded. Mixing in the hand id
    /// keeps consecutive hands of a seeded table from sharing a deck.
    pub fn deck_seed_for(&self, hand_id: u64) -> Option<u64> {
        self.rng_seed.map(|seed| splitmix64(seed ^ hand_id))
    }
}

/// Fresh deck seed from the thread-local OS-seeded generator.
pub fn fresh_seed() -> u64 {
    rand::rng().random()
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

impl From<GameError> for ConfigError {
    fn from(e: GameError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub max_players: ValueSource,
    pub rng_seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            max_players: ValueSource::Default,
            rng_seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: EngineConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<Chips>,
    #[serde(default)]
    big_blind: Option<Chips>,
    #[serde(default)]
    max_players: Option<usize>,
    #[serde(default)]
    rng_seed: Option<u64>,
}

pub fn load() -> Result<EngineConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by [`CONFIG_PATH_ENV`], then the
/// individual env overrides. The result is validated before it is returned.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = EngineConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.max_players {
            cfg.max_players = v;
            sources.max_players = ValueSource::File;
        }
        if let Some(v) = f.rng_seed {
            cfg.rng_seed = Some(v);
            sources.rng_seed = ValueSource::File;
        }
    }

    if let Some(v) = parse_env(SMALL_BLIND_ENV)? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = parse_env(BIG_BLIND_ENV)? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = parse_env(MAX_PLAYERS_ENV)? {
        cfg.max_players = v;
        sources.max_players = ValueSource::Env;
    }
    if let Some(v) = parse_env(SEED_ENV)? {
        cfg.rng_seed = Some(v);
        sources.rng_seed = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match non_empty_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {key}: {raw:?}"))),
        None => Ok(None),
    }
}
