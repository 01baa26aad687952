//! Picking a spread of comments across the score range.

use serde::{Deserialize, Serialize};

use crate::api::types::CommentData;

/// Comment bodies are cut to this many characters.
pub const MAX_CONTENT_CHARS: usize = 500;

/// A lowest comment scoring below this is swapped for a milder one.
const HEAVY_DOWNVOTE: i64 = -5;

/// Lowest score acceptable as a replacement for a heavily downvoted comment.
const MILD_DOWNVOTE: i64 = -1;

const REMOVED_BODIES: [&str; 2] = ["[deleted]", "[removed]"];
const EXCLUDED_AUTHORS: [&str; 2] = ["[deleted]", "AutoModerator"];

/// One sampled comment. Unfilled slots are `("", 0)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSlot {
    pub content: String,
    pub votes: i64,
}

/// Exactly N comment slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentSample {
    pub slots: Vec<CommentSlot>,
}

impl CommentSample {
    pub fn empty(samples: usize) -> Self {
        Self {
            slots: vec![CommentSlot::default(); samples],
        }
    }

    /// Slots holding an actual comment.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| !s.content.is_empty()).count()
    }
}

/// Indices into `scores` (sorted highest first) for `samples` slots.
///
/// Slot 0 is the top comment and the last slot the bottom one, with middle
/// slots spaced evenly by rank. When there are more comments than slots and
/// the bottom one is below -5, the lowest comment at -1 or above stands in.
pub fn select_indices(scores: &[i64], samples: usize) -> Vec<usize> {
    let len = scores.len();
    let slots = samples.min(len);

    match slots {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let last = len - 1;
    let bottom = if scores[last] < HEAVY_DOWNVOTE && len > samples {
        scores
            .iter()
            .rposition(|score| *score >= MILD_DOWNVOTE)
            .unwrap_or(last)
    } else {
        last
    };

    let mut indices = Vec::with_capacity(slots);
    indices.push(0);
    for i in 1..slots - 1 {
        let spread = (last * i) as f64 / (slots - 1) as f64;
        indices.push(spread.round() as usize);
    }
    indices.push(bottom);
    indices
}

/// Filter, rank and sample `comments` into exactly `samples` slots.
pub fn select_comments(comments: Vec<CommentData>, samples: usize) -> CommentSample {
    let mut usable: Vec<CommentData> = comments.into_iter().filter(is_usable).collect();
    usable.sort_by_key(|c| std::cmp::Reverse(c.score.unwrap_or(0)));

    let scores: Vec<i64> = usable.iter().map(|c| c.score.unwrap_or(0)).collect();
    let mut slots: Vec<CommentSlot> = select_indices(&scores, samples)
        .into_iter()
        .map(|index| CommentSlot {
            content: truncate_chars(usable[index].body.as_deref().unwrap_or_default()),
            votes: scores[index],
        })
        .collect();
    slots.resize(samples, CommentSlot::default());

    CommentSample { slots }
}

fn is_usable(comment: &CommentData) -> bool {
    let body_ok = matches!(
        comment.body.as_deref(),
        Some(body) if !body.is_empty() && !REMOVED_BODIES.contains(&body)
    );
    let author_ok = matches!(
        comment.author.as_deref(),
        Some(author) if !EXCLUDED_AUTHORS.contains(&author)
    );
    body_ok && author_ok
}

fn truncate_chars(text: &str) -> String {
    text.chars().take(MAX_CONTENT_CHARS).collect()
}
