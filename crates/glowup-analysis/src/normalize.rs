//! Cleaning of raw post text ahead of prompt assembly.
//!
//! Posts arrive as arbitrary JSON values. Anything that is not a string is
//! skipped, and the surviving text is stripped of URLs, @mentions, #hashtags,
//! and non-ASCII runs before whitespace is collapsed. Posts that clean down
//! to nothing are dropped so placeholder handling can key off an empty batch.

use regex::Regex;
use serde_json::Value;

/// Cleans a single post.
///
/// Removes URL-like tokens (`http`/`www` prefixes up to the next whitespace),
/// `@mentions`, and `#hashtags`, replaces each run of non-ASCII characters
/// with a single space, then collapses all whitespace to single spaces and
/// trims. Applying it twice yields the same output as applying it once.
#[must_use]
pub fn clean_post(text: &str) -> String {
    let urls = Regex::new(r"http\S+|www\S+").expect("valid url regex");
    let mentions = Regex::new(r"@\w+").expect("valid mention regex");
    let hashtags = Regex::new(r"#\w+").expect("valid hashtag regex");
    let non_ascii = Regex::new(r"[^\x00-\x7F]+").expect("valid non-ascii regex");

    let text = urls.replace_all(text, "");
    let text = mentions.replace_all(&text, "");
    let text = hashtags.replace_all(&text, "");
    let text = non_ascii.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans a batch of raw input items.
///
/// Items that are not strings (including `null`) are skipped; cleaned posts
/// that come out empty are dropped.
#[must_use]
pub fn clean_batch(posts: &[Value]) -> Vec<String> {
    posts
        .iter()
        .filter_map(Value::as_str)
        .map(clean_post)
        .filter(|text| !text.is_empty())
        .collect()
}
