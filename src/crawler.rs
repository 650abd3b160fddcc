use crate::{
    dom::Dom,
    extract::{
        extract_engagement_metrics, extract_post_content, extract_post_metadata, CommentLoader,
    },
    options::CrawlOptions,
    types::{PostRecord, ScrapeError},
    utils::{pause, Clock},
};

/// Crawls a single post: navigate, settle, then run every extractor.
pub struct Crawler<'a, D: Dom> {
    dom: &'a D,
    clock: &'a dyn Clock,
    options: &'a CrawlOptions,
}

impl<'a, D: Dom> Crawler<'a, D> {
    pub fn new(dom: &'a D, clock: &'a dyn Clock, options: &'a CrawlOptions) -> Self {
        Crawler {
            dom,
            clock,
            options,
        }
    }

    pub fn crawl(&self, url: &str) -> Result<PostRecord, ScrapeError> {
        self.try_crawl(url).map_err(|e| ScrapeError::CrawlFailure {
            url: url.into(),
            reason: format!("{:#}", e),
        })
    }

    fn try_crawl(&self, url: &str) -> anyhow::Result<PostRecord> {
        debug!("navigating to {}", url);
        self.dom.goto(url, self.options.navigation_timeout)?;
        self.wait_for_page_load();

        let content = extract_post_content(self.dom);
        let metadata = extract_post_metadata(self.dom);
        let metrics = extract_engagement_metrics(self.dom, self.options);
        let comments = CommentLoader::new(self.dom, self.clock, self.options).load();

        info!(
            "crawled {}: {} reactions, {} comments ({} read), {} shares",
            url,
            metrics.reactions_count,
            metrics.comments_count,
            comments.len(),
            metrics.shares_count
        );

        Ok(PostRecord::new(url, metadata, content, metrics, comments))
    }

    fn wait_for_page_load(&self) {
        if let Err(e) = self.dom.wait_for_idle(self.options.idle_timeout) {
            debug!("page did not go idle ({}), falling back to a fixed wait", e);
            pause(self.clock, &self.options.idle_fallback);
        }
    }
}
