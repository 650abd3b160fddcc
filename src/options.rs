use std::time::Duration;

use crate::utils::Pause;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct CrawlOptions {
    // run chrome without a window
    #[builder(default = "true")]
    pub headless: bool,
    #[builder(default = "self.default_user_agent()")]
    pub user_agent: String,
    #[builder(default = "(1920, 1080)")]
    pub viewport: (u32, u32),
    // how long chrome may sit idle before headless_chrome gives up on it
    #[builder(default = "Duration::from_secs(45)")]
    pub browser_timeout: Duration,
    // tab-wide default for element waits, clicks and text reads
    #[builder(default = "Duration::from_secs(3)")]
    pub element_timeout: Duration,
    #[builder(default = "Duration::from_secs(30)")]
    pub navigation_timeout: Duration,
    #[builder(default = "Duration::from_secs(10)")]
    pub idle_timeout: Duration,
    // fixed pause used when the idle wait errors out
    #[builder(default = "Pause::fixed(Duration::from_secs(2))")]
    pub idle_fallback: Pause,
    // how long to wait for the reaction counter to render at all
    #[builder(default = "Duration::from_secs(15)")]
    pub reaction_wait: Duration,
    // reads of the same counter element, the largest value wins
    #[builder(default = "1")]
    pub metric_reads: usize,
    #[builder(default = "Pause::fixed(Duration::from_secs(1))")]
    pub sort_click_pause: Pause,
    #[builder(default = "Pause::fixed(Duration::from_secs(2))")]
    pub expand_click_pause: Pause,
    // pixels per scroll of the comment container
    #[builder(default = "1500")]
    pub scroll_step: i64,
    // larger scroll tried once when the height did not change
    #[builder(default = "2500")]
    pub nudge_step: i64,
    #[builder(default = "1000")]
    pub max_scroll_iterations: usize,
    #[builder(default = "Pause::between(Duration::from_secs(1), Duration::from_secs(2))")]
    pub scroll_pause: Pause,
    #[builder(default = "Pause::between(Duration::from_secs(1), Duration::from_secs(2))")]
    pub between_posts: Pause,
}

impl CrawlOptions {
    pub fn default_builder() -> CrawlOptionsBuilder {
        CrawlOptionsBuilder::default()
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        CrawlOptions {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.into(),
            viewport: (1920, 1080),
            browser_timeout: Duration::from_secs(45),
            element_timeout: Duration::from_secs(3),
            navigation_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10),
            idle_fallback: Pause::fixed(Duration::from_secs(2)),
            reaction_wait: Duration::from_secs(15),
            metric_reads: 1,
            sort_click_pause: Pause::fixed(Duration::from_secs(1)),
            expand_click_pause: Pause::fixed(Duration::from_secs(2)),
            scroll_step: 1500,
            nudge_step: 2500,
            max_scroll_iterations: 1000,
            scroll_pause: Pause::between(Duration::from_secs(1), Duration::from_secs(2)),
            between_posts: Pause::between(Duration::from_secs(1), Duration::from_secs(2)),
        }
    }
}

impl CrawlOptionsBuilder {
    fn default_user_agent(&self) -> String {
        DEFAULT_USER_AGENT.into()
    }
}
