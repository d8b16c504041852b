//! Engagement roll-ups over raw timeline posts.
//!
//! Takes posts in the shape the timeline API returns them (text, creation
//! time, reply marker, `public_metrics` counters), splits the timeline into
//! its older and newer halves, and summarizes likes, replies, retweets, and
//! impressions per half along with the percentage change between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engagement counters as the timeline API reports them per post.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub impression_count: u64,
}

/// A raw timeline post.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePost {
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

/// Summed engagement counters for a batch of posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementTotals {
    pub likes: u64,
    pub replies: u64,
    pub retweets: u64,
    pub impressions: u64,
}

/// Per-post averages for a batch; all zero for an empty batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngagementAverages {
    pub likes: f64,
    pub replies: f64,
    pub retweets: f64,
    pub impressions: f64,
}

/// Totals and averages for one period of the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub total: EngagementTotals,
    pub average: EngagementAverages,
}

/// Percentage change per counter between the two periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngagementDelta {
    pub likes: f64,
    pub replies: f64,
    pub retweets: f64,
    pub impressions: f64,
}

/// The full engagement comparison for a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngagementReport {
    pub then: EngagementSummary,
    pub now: EngagementSummary,
    pub difference: EngagementDelta,
}

/// Sums and averages the engagement counters of a batch.
#[must_use]
pub fn summarize(posts: &[TimelinePost]) -> EngagementSummary {
    let mut total = EngagementTotals::default();
    for post in posts {
        total.likes += post.public_metrics.like_count;
        total.replies += post.public_metrics.reply_count;
        total.retweets += post.public_metrics.retweet_count;
        total.impressions += post.public_metrics.impression_count;
    }

    EngagementSummary {
        total,
        average: averages(total, posts.len()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn averages(total: EngagementTotals, count: usize) -> EngagementAverages {
    if count == 0 {
        return EngagementAverages::default();
    }
    let n = count as f64;
    EngagementAverages {
        likes: total.likes as f64 / n,
        replies: total.replies as f64 / n,
        retweets: total.retweets as f64 / n,
        impressions: total.impressions as f64 / n,
    }
}

/// Percentage change of each counter from `then` to `now`.
///
/// A zero baseline uses a denominator of one, so a fresh account shows the
/// raw growth as a percentage instead of dividing by zero.
#[must_use]
pub fn percent_change(then: EngagementTotals, now: EngagementTotals) -> EngagementDelta {
    EngagementDelta {
        likes: pct(then.likes, now.likes),
        replies: pct(then.replies, now.replies),
        retweets: pct(then.retweets, now.retweets),
        impressions: pct(then.impressions, now.impressions),
    }
}

#[allow(clippy::cast_precision_loss)]
fn pct(then: u64, now: u64) -> f64 {
    let base = if then == 0 { 1.0 } else { then as f64 };
    (now as f64 - then as f64) / base * 100.0
}

/// Splits a timeline into its "then" and "now" halves.
///
/// Retweets (text starting with `RT`) and replies are dropped first, the
/// remainder is sorted by creation time (posts without one sort first), and
/// the older half becomes "then". An odd-length timeline puts the extra post
/// in "now".
#[must_use]
pub fn split_periods(posts: Vec<TimelinePost>) -> (Vec<TimelinePost>, Vec<TimelinePost>) {
    let mut originals: Vec<TimelinePost> = posts
        .into_iter()
        .filter(|post| !post.text.starts_with("RT") && post.in_reply_to_user_id.is_none())
        .collect();
    originals.sort_by_key(|post| post.created_at);

    let midpoint = originals.len() / 2;
    let now = originals.split_off(midpoint);
    (originals, now)
}

/// Builds the full engagement comparison for a raw timeline.
#[must_use]
pub fn engagement_report(posts: Vec<TimelinePost>) -> EngagementReport {
    let (then, now) = split_periods(posts);
    let then = summarize(&then);
    let now = summarize(&now);

    EngagementReport {
        then,
        now,
        difference: percent_change(then.total, now.total),
    }
}
