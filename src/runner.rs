use crate::{
    browser_controller::BrowserController,
    crawler::Crawler,
    dom::Dom,
    options::CrawlOptions,
    types::{BatchResult, ScrapeError},
    utils::{check_post_links, pause, Clock, SystemClock},
};

/// Called with `(completed, total)` after every url, skipped ones included.
pub type Progress<'p> = &'p dyn Fn(usize, usize);

/// Crawls a list of posts one after the other on a single page.
pub struct Runner<'a, D: Dom> {
    dom: &'a D,
    clock: &'a dyn Clock,
    options: &'a CrawlOptions,
}

impl<'a, D: Dom> Runner<'a, D> {
    pub fn new(dom: &'a D, clock: &'a dyn Clock, options: &'a CrawlOptions) -> Self {
        Runner {
            dom,
            clock,
            options,
        }
    }

    /// Validates every link up front, then crawls them in order. A post that
    /// fails is logged and left out of both tables; the batch carries on.
    pub fn run(
        &self,
        links: &[String],
        on_progress: Option<Progress<'_>>,
    ) -> Result<BatchResult, ScrapeError> {
        check_post_links(links)?;

        info!("crawling {} facebook posts", links.len());

        let crawler = Crawler::new(self.dom, self.clock, self.options);
        let total = links.len();
        let mut result = BatchResult::default();

        for (i, url) in links.iter().enumerate() {
            let completed = i + 1;

            match crawler.crawl(url) {
                Ok(record) => result.push(&record),
                Err(e) => error!("{}", e),
            }

            if let Some(progress) = on_progress {
                progress(completed, total);
            }

            if completed < total {
                pause(self.clock, &self.options.between_posts);
            }
        }

        info!(
            "crawl completed: {} of {} posts, {} comment rows",
            result.summaries.len(),
            total,
            result.comment_rows.len()
        );
        Ok(result)
    }
}

/// Crawls `links` with a fresh Chrome session. The links are validated before
/// the browser is launched, and the browser is closed on every way out.
pub fn run_facebook_crawling(
    links: &[String],
    options: &CrawlOptions,
    on_progress: Option<Progress<'_>>,
) -> Result<BatchResult, ScrapeError> {
    check_post_links(links)?;

    let browser =
        BrowserController::new(options).map_err(|e| ScrapeError::Browser(format!("{:#}", e)))?;

    let runner = Runner::new(&browser, &SystemClock, options);
    runner.run(links, on_progress)
}
