//! Field extractors for a rendered post page.
//!
//! Each extractor is independent and absorbs its own failures: a missing or
//! unreadable element yields the field's default, never an error.

pub mod comments;
pub mod content;
pub mod metadata;
pub mod metrics;

pub use comments::{CommentLoader, LoadStats};
pub use content::extract_post_content;
pub use metadata::extract_post_metadata;
pub use metrics::extract_engagement_metrics;
