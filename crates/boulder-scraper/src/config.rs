//! Scraper configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.mountainproject.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site root used to absolutize relative links
    pub base_url: String,
    pub user_agent: String,
    /// Random politeness delay drawn from this window before every request
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Attempts per page before giving up
    pub max_attempts: u32,
    /// Pause after a failed attempt; doubles per failure up to `rate_limit_pause`
    pub retry_pause: Duration,
    /// Pause after an HTTP 429
    pub rate_limit_pause: Duration,
    pub request_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(10),
            max_attempts: 3,
            retry_pause: Duration::from_secs(30),
            rate_limit_pause: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `SCRAPER_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("SCRAPER_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: env::var("SCRAPER_USER_AGENT").unwrap_or(defaults.user_agent),
            min_delay: env_secs("SCRAPER_MIN_DELAY_S").unwrap_or(defaults.min_delay),
            max_delay: env_secs("SCRAPER_MAX_DELAY_S").unwrap_or(defaults.max_delay),
            max_attempts: env::var("SCRAPER_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_attempts),
            retry_pause: env_secs("SCRAPER_RETRY_PAUSE_S").unwrap_or(defaults.retry_pause),
            rate_limit_pause: env_secs("SCRAPER_RATE_LIMIT_PAUSE_S")
                .unwrap_or(defaults.rate_limit_pause),
            request_timeout: env_secs("SCRAPER_TIMEOUT_S").unwrap_or(defaults.request_timeout),
        }
    }

    /// No waiting at all; for tests and local fixtures.
    pub fn without_delays(mut self) -> Self {
        self.min_delay = Duration::ZERO;
        self.max_delay = Duration::ZERO;
        self.retry_pause = Duration::from_millis(1);
        self.rate_limit_pause = Duration::from_millis(1);
        self
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
