//! The handful of page operations the extractors need.
//!
//! Everything that reads the rendered post goes through [`Dom`] and [`Node`],
//! so the extraction rules can be exercised against an in-memory page. The
//! Chrome-backed implementation lives in [`crate::browser_controller`].

use std::time::Duration;

/// A CSS selector with an optional text filter.
///
/// The text filter is a case-insensitive substring match against the
/// element's rendered text, including its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    css: String,
    text: Option<String>,
}

impl Query {
    pub fn css(css: &str) -> Self {
        Query {
            css: css.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_lowercase());
        self
    }

    pub fn selector(&self) -> &str {
        &self.css
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn matches_text(&self, rendered: &str) -> bool {
        match &self.text {
            Some(needle) => rendered.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

pub trait Dom {
    type Node<'a>: Node
    where
        Self: 'a;

    fn goto(&self, url: &str, timeout: Duration) -> anyhow::Result<()>;

    /// Waits until the network has been quiet for a moment.
    fn wait_for_idle(&self, timeout: Duration) -> anyhow::Result<()>;

    /// Waits until at least one element matches `query`.
    fn wait_for(&self, query: &Query, timeout: Duration) -> anyhow::Result<()>;

    /// All matches in document order. No match is an empty vec, not an error.
    fn find_all(&self, query: &Query) -> anyhow::Result<Vec<Self::Node<'_>>>;

    fn find_first(&self, query: &Query) -> anyhow::Result<Option<Self::Node<'_>>> {
        Ok(self.find_all(query)?.into_iter().next())
    }
}

pub trait Node: Sized {
    fn is_visible(&self) -> anyhow::Result<bool>;
    fn inner_text(&self) -> anyhow::Result<String>;
    fn attribute(&self, name: &str) -> anyhow::Result<Option<String>>;
    fn click(&self) -> anyhow::Result<()>;
    fn scroll_by(&self, dy: i64) -> anyhow::Result<()>;
    fn scroll_height(&self) -> anyhow::Result<i64>;
    fn find_all(&self, query: &Query) -> anyhow::Result<Vec<Self>>;
}
