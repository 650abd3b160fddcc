//! Markup-coupled selectors for Facebook post pages.
//!
//! These are best-effort and will drift as Facebook changes its markup.

use regex::Regex;

use crate::dom::Query;

lazy_static! {
    pub static ref POST_MESSAGE: Query = Query::css(r#"[data-ad-preview="message"]"#);

    pub static ref AUTHOR_CANDIDATES: Vec<Query> = vec![Query::css(
        r#"div[data-ad-rendering-role="profile_name"] h3 a[role="link"]"#
    )];

    pub static ref REACTION_CANDIDATES: Vec<Query> =
        vec![Query::css(r#"span[aria-hidden="true"] span span"#)];

    pub static ref COMMENT_COUNT_CANDIDATES: Vec<Query> = vec![
        Query::css("span").with_text("comments"),
        Query::css("span").with_text("bình luận"),
    ];

    pub static ref SHARE_CANDIDATES: Vec<Query> = vec![
        Query::css("span.html-span").with_text("share"),
        Query::css("span.html-span").with_text("lượt chia sẻ"),
    ];

    // "12 shares", "1.2K chia sẻ", "3 lượt chia sẻ"
    pub static ref SHARE_LABEL_RE: Regex =
        Regex::new(r"\d[\d,.]*[kKmM]?\s+(shares|chia sẻ|lượt chia sẻ)$").unwrap();

    pub static ref MOST_RELEVANT: Query = Query::css("span").with_text("Most relevant");

    pub static ref SHOW_ALL_COMMENTS: Query =
        Query::css("span").with_text("Show all comments, including potential spam.");

    pub static ref COMMENT_CONTAINER: Query = Query::css(
        "div.xb57i2i.x1q594ok.x5lxg6s.x78zum5.xdt5ytf.x6ikm8r.x1ja2u2z.x1pq812k.x1rohswg\
         .xfk6m8.x1yqm8si.xjx87ck.xx8ngbg.xwo3gff.x1n2onr6.x1oyok0e.x1odjw0f.x1iyjqo2.xy5w88m"
    );

    pub static ref COMMENT_TEXT: Query = Query::css(
        "div.html-div.xdj266r.x14z9mp.xat24cr.x1lziwak.xexx8yu.x18d9i69.x1g0dm76.xpdmqnj.x1n2onr6 \
         div[dir=\"auto\"][style=\"text-align: start;\"]"
    );

    pub static ref INLINE_EMOJI: Query = Query::css("img[alt]");

    pub static ref POST_URL_RE: Regex =
        Regex::new(r"^https?://www\.facebook\.com/[^/]+/posts/[\w\d]+").unwrap();
}
