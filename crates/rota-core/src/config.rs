use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::types::{Rates, DEFAULT_WEEKDAY_RATE, DEFAULT_WEEKEND_RATE};

pub const DEFAULT_PORT: u16 = 18790;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PAGERDUTY_URL: &str = "https://api.pagerduty.com";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Env key prefixes (after `ROTA_`) and the config tables they address.
/// Longest first, so nested tables win over their parent.
const ENV_TABLES: &[(&str, &str)] = &[
    ("attribution_timezone_policy_", "attribution.timezone_policy."),
    ("attribution_", "attribution."),
    ("gateway_", "gateway."),
    ("rates_", "rates."),
    ("source_", "source."),
];

/// Top-level config (rota.toml + ROTA_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotaConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Standard rates used when a request does not carry its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    #[serde(default = "default_weekday_rate")]
    pub weekday_rate: f64,
    #[serde(default = "default_weekend_rate")]
    pub weekend_rate: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            weekday_rate: DEFAULT_WEEKDAY_RATE,
            weekend_rate: DEFAULT_WEEKEND_RATE,
        }
    }
}

impl RatesConfig {
    pub fn as_rates(&self) -> Rates {
        Rates::new(self.weekday_rate, self.weekend_rate)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Which timezone classifies a segment covered by several schedules.
    #[serde(default)]
    pub timezone_policy: TimezonePolicySetting,
    /// Intervals shorter than this earn nothing. 0 disables the floor.
    #[serde(default)]
    pub min_duration_secs: u64,
}

/// Config-level form of the timezone policy; the timezone name is parsed
/// when the engine is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TimezonePolicySetting {
    /// Timezone of the first active schedule in requested order.
    #[default]
    FirstActive,
    /// Always classify in this IANA timezone.
    Fixed { timezone: String },
    /// Always classify in UTC.
    Utc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// PagerDuty REST API.
    #[default]
    Pagerduty,
    /// In-memory schedules loaded from a JSON fixture file.
    Static,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Pagerduty => write!(f, "pagerduty"),
            SourceKind::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_pagerduty_url")]
    pub base_url: String,
    /// PagerDuty REST API key. Required for the `pagerduty` kind.
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// JSON fixture for the `static` kind.
    pub static_file: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: default_pagerduty_url(),
            api_key: None,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            static_file: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_weekday_rate() -> f64 {
    DEFAULT_WEEKDAY_RATE
}
fn default_weekend_rate() -> f64 {
    DEFAULT_WEEKEND_RATE
}
fn default_pagerduty_url() -> String {
    DEFAULT_PAGERDUTY_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}
fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

impl RotaConfig {
    /// Load config from a TOML file with ROTA_* env var overrides.
    ///
    /// Uses the explicit path when given, otherwise `~/.rota/rota.toml`.
    /// `ROTA_RATES_WEEKDAY_RATE` sets `rates.weekday_rate`: the first `_`
    /// after the table name separates table from field, the rest belong to
    /// the field name. `PAGERDUTY_API_KEY` sets `source.api_key`.
    /// A missing file is not an error; every section has defaults.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::figment(&path)
            .extract()
            .map_err(|e| crate::error::RotaError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ROTA_").map(|key| env_key(key.as_str()).into()))
            .merge(
                Env::raw()
                    .only(&["PAGERDUTY_API_KEY"])
                    .map(|_| "source.api_key".into()),
            )
    }
}

/// Map an env key (prefix stripped) to its dotted config path.
fn env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    ENV_TABLES
        .iter()
        .find_map(|(prefix, table)| key.strip_prefix(prefix).map(|field| format!("{table}{field}")))
        .unwrap_or(key)
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.rota/rota.toml", home)
}
