use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub team: TeamConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub dictionaries: DictionaryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TeamConfig {
    #[serde(default = "default_team_name")]
    pub name: String,
    #[serde(default = "default_opponent")]
    pub opponent: String,
}

fn default_team_name() -> String {
    "Home".to_string()
}
fn default_opponent() -> String {
    "Opponent".to_string()
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: default_team_name(),
            opponent: default_opponent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverConfig {
    /// Max options listed per result set.
    #[serde(default = "default_cap")]
    pub cap: usize,
}

fn default_cap() -> usize { 200 }

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { cap: default_cap() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize { 75 }

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { capacity: default_capacity() }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Early-down gain that counts as a successful offensive snap.
    #[serde(default = "default_success_yards")]
    pub success_yards: i32,
    #[serde(default = "default_explosive_yards")]
    pub explosive_yards: i32,
    #[serde(default = "default_bucket_limit")]
    pub bucket_limit: usize,
}

fn default_success_yards() -> i32 { 4 }
fn default_explosive_yards() -> i32 { 12 }
fn default_bucket_limit() -> usize { 25 }

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            success_yards: default_success_yards(),
            explosive_yards: default_explosive_yards(),
            bucket_limit: default_bucket_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Quiet period before analytics are recomputed after an edit.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 { 200 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClockConfig {
    #[serde(default = "default_quarter_secs")]
    pub quarter_secs: u32,
    #[serde(default = "default_snaps")]
    pub snaps: u32,
    #[serde(default = "default_play_clock")]
    pub play_clock: u32,
    #[serde(default = "default_play_time")]
    pub play_time: u32,
}

fn default_quarter_secs() -> u32 { 720 }
fn default_snaps() -> u32 { 3 }
fn default_play_clock() -> u32 { 40 }
fn default_play_time() -> u32 { 6 }

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            quarter_secs: default_quarter_secs(),
            snaps: default_snaps(),
            play_clock: default_play_clock(),
            play_time: default_play_time(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DictionaryConfig {
    #[serde(default = "default_formations")]
    pub formations: Vec<String>,
    #[serde(default = "default_plays")]
    pub plays: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            formations: default_formations(),
            plays: default_plays(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_formations() -> Vec<String> {
    owned(&[
        "Trips", "Trips Rt", "Trips Lt", "Trips Rt Up", "Trips Lt Up",
        "Doubles", "Doubles Rt", "Doubles Lt", "Deuce", "Trey",
        "Empty", "Bunch", "Bunch Rt", "Bunch Lt", "Twins", "Twins Rt", "Twins Lt",
        "Pro", "Slot", "I Form", "Power I", "Wing", "Wing T", "Pistol",
        "Shotgun", "Ace", "Heavy", "Jumbo", "Spread",
    ])
}

fn default_plays() -> Vec<String> {
    owned(&[
        "Inside Zone", "Outside Zone", "Power", "Counter", "Trap", "Dive",
        "Iso", "Sweep", "Toss", "Jet", "Buck Sweep", "Draw", "QB Sneak",
        "QB Power", "Read Option", "RPO", "Slant", "Stick", "Smash", "Mesh",
        "Flood", "Four Verts", "Y Cross", "Curl", "Hitch", "Out", "Fade",
        "Post", "Corner", "Wheel", "Seam", "Screen", "Bubble", "Tunnel",
        "Boot", "Play Action", "Travel",
    ])
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Like [`Config::load`] but a missing file falls back to defaults.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
