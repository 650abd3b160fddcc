use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("crawl_failure: could not crawl {url}: {reason}")]
    CrawlFailure { url: String, reason: String },
    #[error("browser: {0}")]
    Browser(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub author: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub reactions_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
}

/// Everything gathered from one post page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub url: String,
    pub author: String,
    pub content: String,
    pub reactions_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    pub comments: Vec<CommentRecord>,
}

impl PostRecord {
    pub fn new(
        url: &str,
        metadata: PostMetadata,
        content: String,
        metrics: EngagementMetrics,
        comments: Vec<CommentRecord>,
    ) -> Self {
        PostRecord {
            url: url.into(),
            author: metadata.author,
            content,
            reactions_count: metrics.reactions_count,
            comments_count: metrics.comments_count,
            shares_count: metrics.shares_count,
            comments,
        }
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            url: self.url.clone(),
            author: self.author.clone(),
            content: self.content.clone(),
            reactions_count: self.reactions_count,
            comments_count: self.comments_count,
            shares_count: self.shares_count,
            total_comments_crawled: self.comments.len(),
        }
    }

    /// One row per comment, or a single empty row so the url still shows up
    /// in the comment table.
    pub fn comment_rows(&self) -> Vec<CommentRow> {
        if self.comments.is_empty() {
            return vec![CommentRow {
                url: self.url.clone(),
                comment_text: String::new(),
            }];
        }
        self.comments
            .iter()
            .map(|c| CommentRow {
                url: self.url.clone(),
                comment_text: c.text.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub url: String,
    pub author: String,
    pub content: String,
    pub reactions_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    pub total_comments_crawled: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRow {
    pub url: String,
    pub comment_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub summaries: Vec<PostSummary>,
    pub comment_rows: Vec<CommentRow>,
}

impl BatchResult {
    pub fn push(&mut self, record: &PostRecord) {
        self.summaries.push(record.summary());
        self.comment_rows.extend(record.comment_rows());
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            posts: self.summaries.len(),
            comment_rows: self.comment_rows.len(),
            total_reactions: self
                .summaries
                .iter()
                .fold(0u64, |acc, s| acc.saturating_add(s.reactions_count)),
            total_shares: self
                .summaries
                .iter()
                .fold(0u64, |acc, s| acc.saturating_add(s.shares_count)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub posts: usize,
    pub comment_rows: usize,
    pub total_reactions: u64,
    pub total_shares: u64,
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   - posts: {}", self.posts)?;
        writeln!(f, "   - comments: {}", self.comment_rows)?;
        writeln!(f, "   - total reactions: {}", self.total_reactions)?;
        write!(f, "   - total shares: {}", self.total_shares)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(comments: &[&str]) -> PostRecord {
        PostRecord {
            url: "https://www.facebook.com/someuser/posts/1".into(),
            author: "Some User".into(),
            content: "hello".into(),
            reactions_count: 10,
            comments_count: 3,
            shares_count: 2,
            comments: comments
                .iter()
                .map(|t| CommentRecord { text: t.to_string() })
                .collect(),
        }
    }

    #[test]
    fn post_without_comments_keeps_one_empty_row() {
        let rows = record(&[]).comment_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment_text, "");
        assert_eq!(rows[0].url, "https://www.facebook.com/someuser/posts/1");
    }

    #[test]
    fn summary_counts_crawled_comments() {
        let r = record(&["a", "b"]);
        let s = r.summary();
        assert_eq!(s.total_comments_crawled, 2);
        assert_eq!(s.comments_count, 3);
        assert_eq!(r.comment_rows().len(), 2);
    }

    #[test]
    fn batch_stats_sum_up() {
        let mut batch = BatchResult::default();
        batch.push(&record(&["a", "b"]));
        batch.push(&record(&[]));
        let stats = batch.stats();
        assert_eq!(stats.posts, 2);
        assert_eq!(stats.comment_rows, 3);
        assert_eq!(stats.total_reactions, 20);
        assert_eq!(stats.total_shares, 4);
    }

    #[test]
    fn batch_stats_saturate() {
        let mut big = record(&[]);
        big.reactions_count = u64::MAX;
        big.shares_count = u64::MAX;
        let mut batch = BatchResult::default();
        batch.push(&big);
        batch.push(&record(&[]));
        let stats = batch.stats();
        assert_eq!(stats.total_reactions, u64::MAX);
        assert_eq!(stats.total_shares, u64::MAX);
    }
}
