use crate::{
    dom::{Dom, Node, Query},
    options::CrawlOptions,
    selectors::{COMMENT_CONTAINER, COMMENT_TEXT, INLINE_EMOJI, MOST_RELEVANT, SHOW_ALL_COMMENTS},
    types::CommentRecord,
    utils::{pause, Clock},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    // scroll calls made, nudges included
    pub scroll_attempts: usize,
    pub iterations: usize,
    pub final_height: i64,
    // true when the height stopped growing, false when the cap was hit
    pub exhausted: bool,
}

/// Forces the lazily rendered comment list to materialize, then reads it.
pub struct CommentLoader<'a, D: Dom> {
    dom: &'a D,
    clock: &'a dyn Clock,
    options: &'a CrawlOptions,
}

impl<'a, D: Dom> CommentLoader<'a, D> {
    pub fn new(dom: &'a D, clock: &'a dyn Clock, options: &'a CrawlOptions) -> Self {
        CommentLoader {
            dom,
            clock,
            options,
        }
    }

    pub fn load(&self) -> Vec<CommentRecord> {
        match self.click_if_present(&MOST_RELEVANT) {
            Ok(true) => pause(self.clock, &self.options.sort_click_pause),
            Ok(false) => {}
            Err(e) => warn!("could not find or click 'Most relevant': {}", e),
        }

        match self.click_if_present(&SHOW_ALL_COMMENTS) {
            Ok(true) => pause(self.clock, &self.options.expand_click_pause),
            Ok(false) => {}
            Err(e) => warn!("could not find or click 'All comments': {}", e),
        }

        match self.scroll_to_exhaustion() {
            Ok(stats) => debug!("comment scrolling ended {:?}", stats),
            Err(e) => warn!("scroll error: {}", e),
        }

        self.extract_comments()
    }

    fn click_if_present(&self, query: &Query) -> anyhow::Result<bool> {
        match self.dom.find_first(query)? {
            Some(button) => {
                debug!("clicking {:?}", query.text().unwrap_or(query.selector()));
                button.click()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Scrolls the comment container until its height stops growing.
    ///
    /// An unchanged height after a regular step is double-checked with one
    /// larger step before giving up, since a slow load looks the same as the
    /// end of the list. The loop never runs more than `max_scroll_iterations`
    /// times.
    pub fn scroll_to_exhaustion(&self) -> anyhow::Result<LoadStats> {
        let mut stats = LoadStats::default();

        let container = match self.dom.find_first(&COMMENT_CONTAINER)? {
            Some(c) => c,
            None => {
                debug!("no scrollable comment container");
                return Ok(stats);
            }
        };

        let mut previous = container.scroll_height()?;
        stats.final_height = previous;

        while stats.iterations < self.options.max_scroll_iterations {
            stats.iterations += 1;

            container.scroll_by(self.options.scroll_step)?;
            stats.scroll_attempts += 1;
            pause(self.clock, &self.options.scroll_pause);

            let mut current = container.scroll_height()?;
            if current == previous {
                debug!("height stuck at {}, nudging", current);
                container.scroll_by(self.options.nudge_step)?;
                stats.scroll_attempts += 1;
                pause(self.clock, &self.options.scroll_pause);

                current = container.scroll_height()?;
                if current == previous {
                    stats.exhausted = true;
                    break;
                }
            }

            debug!("comment container grew {} -> {}", previous, current);
            previous = current;
            stats.final_height = current;
        }

        if !stats.exhausted {
            warn!(
                "stopped scrolling comments after {} iterations",
                stats.iterations
            );
        }
        Ok(stats)
    }

    /// Reads every rendered comment in document order. Inline emoji are
    /// images, so their alt text is appended as trailing tokens.
    pub fn extract_comments(&self) -> Vec<CommentRecord> {
        let elements = match self.dom.find_all(&COMMENT_TEXT) {
            Ok(els) => els,
            Err(e) => {
                error!("error extracting comments: {}", e);
                return vec![];
            }
        };

        let mut comments = Vec::with_capacity(elements.len());
        for el in elements {
            let mut text = match el.inner_text() {
                Ok(t) => t.trim().to_string(),
                Err(e) => {
                    debug!("skipping unreadable comment: {}", e);
                    continue;
                }
            };

            match el.find_all(&INLINE_EMOJI) {
                Ok(emojis) => {
                    for emoji in emojis {
                        if let Ok(Some(alt)) = emoji.attribute("alt") {
                            if !alt.is_empty() {
                                text.push(' ');
                                text.push_str(&alt);
                            }
                        }
                    }
                }
                Err(e) => debug!("could not read emoji of comment: {}", e),
            }

            comments.push(CommentRecord { text });
        }

        debug!("extracted {} comments", comments.len());
        comments
    }
}
