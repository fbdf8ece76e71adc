//! Incremental text reveal for assistant replies.
//!
//! Display timing only; the stored message is never touched.

use std::time::Duration;

pub const REVEAL_INTERVAL: Duration = Duration::from_millis(30);

/// Split into words and the whitespace runs between them, keeping both so
/// concatenating the chunks restores the input exactly.
pub fn reveal_chunks(content: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in content.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                chunks.push(&content[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < content.len() {
        chunks.push(&content[start..]);
    }
    chunks
}

/// Feed `sink` the growing prefix of `content`, one chunk per `interval`.
///
/// User messages and non-animated replies are delivered whole, once.
pub async fn reveal(
    content: &str,
    is_user: bool,
    animate: bool,
    interval: Duration,
    mut sink: impl FnMut(&str),
) {
    if is_user || !animate {
        sink(content);
        return;
    }

    let mut shown = String::with_capacity(content.len());
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    for chunk in reveal_chunks(content) {
        ticker.tick().await;
        shown.push_str(chunk);
        sink(&shown);
    }
}
