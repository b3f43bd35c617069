// config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one run. Every default here is deliberate and can be
/// overridden through a `NINJA_*` environment variable without touching
/// the command line, so operational knobs stay out of the CLI surface.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing root; the league is appended as a path segment.
    pub base_url: String,
    /// Render attempts per page before the run gives up.
    pub max_attempts: u32,
    /// First retry delay in seconds; doubles on each further attempt.
    pub backoff_base_secs: u64,
    /// Ceiling for the doubled delay.
    pub backoff_cap_secs: u64,
    /// Up to this many extra seconds of random jitter per backoff.
    pub jitter_max_secs: u64,
    /// End-to-end budget for a single render call.
    pub render_timeout: Duration,
    /// Pause between network fetches of consecutive pages.
    pub page_delay: Duration,
    /// Pause between build-detail fetches during import-code export.
    pub pob_delay: Duration,
    /// Root of the raw-capture cache.
    pub cache_dir: PathBuf,
    /// Captures younger than this are reused without a render call.
    pub cache_freshness: Duration,
    /// Snapshot root used when no explicit output path is given.
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://poe.ninja/builds".to_string(),
            max_attempts: 3,
            backoff_base_secs: 2,
            backoff_cap_secs: 10,
            jitter_max_secs: 2,
            render_timeout: Duration::from_secs(60),
            page_delay: Duration::from_secs(2),
            pob_delay: Duration::from_secs(2),
            cache_dir: PathBuf::from(".capture-cache"),
            cache_freshness: Duration::from_secs(6 * 60 * 60),
            out_dir: PathBuf::from("builds"),
        }
    }
}

impl Config {
    /// Defaults with any `NINJA_*` overrides applied. An override that
    /// does not parse falls back to the default.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            base_url: env::var("NINJA_BASE_URL").unwrap_or(defaults.base_url),
            max_attempts: env_parsed("NINJA_MAX_ATTEMPTS", defaults.max_attempts),
            backoff_base_secs: env_parsed("NINJA_BACKOFF_SECS", defaults.backoff_base_secs),
            backoff_cap_secs: env_parsed("NINJA_BACKOFF_CAP_SECS", defaults.backoff_cap_secs),
            jitter_max_secs: env_parsed("NINJA_JITTER_SECS", defaults.jitter_max_secs),
            render_timeout: Duration::from_secs(env_parsed(
                "NINJA_RENDER_TIMEOUT_SECS",
                defaults.render_timeout.as_secs(),
            )),
            page_delay: Duration::from_secs(env_parsed(
                "NINJA_PAGE_DELAY_SECS",
                defaults.page_delay.as_secs(),
            )),
            pob_delay: Duration::from_secs(env_parsed(
                "NINJA_POB_DELAY_SECS",
                defaults.pob_delay.as_secs(),
            )),
            cache_dir: env::var("NINJA_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_freshness: Duration::from_secs(env_parsed(
                "NINJA_CACHE_FRESH_SECS",
                defaults.cache_freshness.as_secs(),
            )),
            out_dir: env::var("NINJA_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.out_dir),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
