use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.site.base_url)
            .with_context(|| format!("site.base_url is not a valid url: {}", self.site.base_url))?;
        if self.site.user_agent.trim().is_empty() {
            bail!("site.user_agent must not be empty");
        }
        if self.pagination.page_size == 0 {
            bail!("pagination.page_size must be greater than zero");
        }
        if self.pagination.max_pages == 0 {
            bail!("pagination.max_pages must be greater than zero");
        }
        if self.fetch.timeout_ms == 0 || self.fetch.search_timeout_ms == 0 {
            bail!("fetch timeouts must be greater than zero");
        }
        Ok(())
    }

    /// Zeroes every politeness delay. Intended for fixture-backed runs.
    pub fn without_delays(mut self) -> Self {
        self.fetch.search_delay_ms = 0;
        self.fetch.profile_delay_ms = 0;
        self.fetch.page_delay_ms = 0;
        self.fetch.page_delay_step_ms = 0;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            headers: default_headers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    #[serde(default = "default_profile_delay_ms")]
    pub profile_delay_ms: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_page_delay_step_ms")]
    pub page_delay_step_ms: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn profile_delay(&self) -> Duration {
        Duration::from_millis(self.profile_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            search_timeout_ms: default_search_timeout_ms(),
            search_delay_ms: default_search_delay_ms(),
            profile_delay_ms: default_profile_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
            page_delay_step_ms: default_page_delay_step_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_showtypes")]
    pub showtypes: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            showtypes: default_showtypes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_promotions")]
    pub promotions: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            promotions: default_promotions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_bio_chars")]
    pub bio_chars: usize,
    #[serde(default = "default_championships")]
    pub championships: usize,
    #[serde(default = "default_timeline_events")]
    pub timeline_events: usize,
    #[serde(default = "default_achievements")]
    pub achievements: usize,
    #[serde(default = "default_rivalry_candidates")]
    pub rivalry_candidates: usize,
    #[serde(default = "default_rivalries")]
    pub rivalries: usize,
    #[serde(default = "default_performance_periods")]
    pub performance_periods: usize,
    #[serde(default = "default_recent_matches")]
    pub recent_matches: usize,
    #[serde(default = "default_related")]
    pub related: usize,
    #[serde(default = "default_featured")]
    pub featured: usize,
    #[serde(default = "default_recent_form")]
    pub recent_form: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            bio_chars: default_bio_chars(),
            championships: default_championships(),
            timeline_events: default_timeline_events(),
            achievements: default_achievements(),
            rivalry_candidates: default_rivalry_candidates(),
            rivalries: default_rivalries(),
            performance_periods: default_performance_periods(),
            recent_matches: default_recent_matches(),
            related: default_related(),
            featured: default_featured(),
            recent_form: default_recent_form(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Loads and validates a config file. A missing path yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    };

    if !path.exists() {
        bail!("config file does not exist: {}", path.display());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: Config = toml::from_str(&text)
        .with_context(|| format!("failed to parse toml in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn default_base_url() -> String {
    "https://www.cagematch.net/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
        ),
        ("accept-language".to_string(), "en-US,en;q=0.5".to_string()),
        ("upgrade-insecure-requests".to_string(), "1".to_string()),
    ])
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_search_timeout_ms() -> u64 {
    15_000
}

fn default_search_delay_ms() -> u64 {
    1_000
}

fn default_profile_delay_ms() -> u64 {
    1_500
}

fn default_page_delay_ms() -> u64 {
    2_000
}

fn default_page_delay_step_ms() -> u64 {
    250
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    5
}

fn default_showtypes() -> Vec<String> {
    vec![
        "TV-Show".to_string(),
        "Pay Per View".to_string(),
        "Premium Live Event".to_string(),
        "Online Stream".to_string(),
    ]
}

fn default_promotions() -> Vec<String> {
    vec!["WWE".to_string(), "AEW".to_string()]
}

fn default_bio_chars() -> usize {
    500
}

fn default_championships() -> usize {
    20
}

fn default_timeline_events() -> usize {
    15
}

fn default_achievements() -> usize {
    10
}

fn default_rivalry_candidates() -> usize {
    10
}

fn default_rivalries() -> usize {
    6
}

fn default_performance_periods() -> usize {
    12
}

fn default_recent_matches() -> usize {
    5
}

fn default_related() -> usize {
    6
}

fn default_featured() -> usize {
    5
}

fn default_recent_form() -> usize {
    10
}

fn default_ttl_secs() -> u64 {
    300
}
