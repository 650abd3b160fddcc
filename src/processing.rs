//! Cleaning of the crawled tables before they are saved.

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::types::{CommentRow, PostSummary};

/// Stand-in content for posts without text, which are almost always cover
/// photo updates.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "Cập nhật ảnh bìa";

lazy_static! {
    static ref HAS_WORD_RE: Regex = Regex::new(r"[A-Za-zÀ-ỹ0-9]").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPost {
    pub url: String,
    pub author: String,
    pub content: String,
    pub reactions_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    pub total_comments_crawled: usize,
    pub total_engagement: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedComment {
    pub url: String,
    pub comment: String,
}

pub fn process_posts(posts: &[PostSummary]) -> Vec<ProcessedPost> {
    posts
        .iter()
        .map(|p| ProcessedPost {
            url: p.url.clone(),
            author: p.author.clone(),
            content: if p.content.is_empty() {
                EMPTY_CONTENT_PLACEHOLDER.into()
            } else {
                p.content.clone()
            },
            reactions_count: p.reactions_count,
            comments_count: p.comments_count,
            shares_count: p.shares_count,
            total_comments_crawled: p.total_comments_crawled,
            total_engagement: p
                .reactions_count
                .saturating_add(p.shares_count)
                .saturating_add(p.total_comments_crawled as u64),
        })
        .collect()
}

/// Drops repeated `(url, text)` pairs, keeping the first, and strips emoji
/// from comments that also carry words.
pub fn process_comments(rows: &[CommentRow]) -> Vec<ProcessedComment> {
    rows.iter()
        .unique_by(|r| (r.url.clone(), r.comment_text.clone()))
        .map(|r| ProcessedComment {
            url: r.url.clone(),
            comment: remove_emojis_from_text(&r.comment_text),
        })
        .collect()
}

/// Emoji-only comments are left alone so they do not turn into blanks.
///
/// Works on grapheme clusters so that keycaps, skin tones and joined
/// sequences go away whole.
pub fn remove_emojis_from_text(text: &str) -> String {
    if !HAS_WORD_RE.is_match(text) {
        return text.to_string();
    }
    text.graphemes(true).filter(|g| !is_emoji(g)).collect()
}

fn is_emoji(grapheme: &str) -> bool {
    if emojis::get(grapheme).is_some() {
        return true;
    }
    // unqualified forms and skin tone variants of a known emoji
    let base: String = grapheme
        .chars()
        .filter(|c| !matches!(*c as u32, 0xFE0F | 0x1F3FB..=0x1F3FF))
        .collect();
    base != grapheme && emojis::get(&base).is_some()
}
