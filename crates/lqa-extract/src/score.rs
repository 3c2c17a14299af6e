//! Listing quality score.
//!
//! A deterministic weighted sum over independent boolean checks. The
//! weights sum to exactly 100, so the score is bounded by construction
//! and adding any single qualifying condition never lowers it.

use lqa_core::{Record, NONE};

const TITLE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 80..=200;
const TITLE_WEIGHT: u8 = 10;
const IMAGE_THRESHOLD: usize = 7;
const IMAGE_WEIGHT: u8 = 15;
const BULLET_THRESHOLD: usize = 5;
const BULLET_WEIGHT: u8 = 15;
const DESCRIPTION_THRESHOLD: usize = 100;
const DESCRIPTION_WEIGHT: u8 = 5;
const VIDEO_WEIGHT: u8 = 15;
const APLUS_WEIGHT: u8 = 20;
const RATING_THRESHOLD: f32 = 4.0;
const RATING_WEIGHT: u8 = 10;
const REVIEW_THRESHOLD: u64 = 15;
const REVIEW_WEIGHT: u8 = 10;

/// Scores an extracted record on the fixed `[0, 100]` scale.
#[must_use]
pub fn score(record: &Record) -> u8 {
    let mut total = 0u8;

    if record.meta_title != NONE && TITLE_LENGTH_RANGE.contains(&record.meta_title.chars().count())
    {
        total += TITLE_WEIGHT;
    }
    if record.images.len() >= IMAGE_THRESHOLD {
        total += IMAGE_WEIGHT;
    }
    if record.bullet_count >= BULLET_THRESHOLD {
        total += BULLET_WEIGHT;
    }
    if record.description_length >= DESCRIPTION_THRESHOLD {
        total += DESCRIPTION_WEIGHT;
    }
    if !record.videos.is_empty() {
        total += VIDEO_WEIGHT;
    }
    if !record.aplus_images.is_empty() {
        total += APLUS_WEIGHT;
    }
    if record.rating_value >= RATING_THRESHOLD {
        total += RATING_WEIGHT;
    }
    if record.review_count > REVIEW_THRESHOLD {
        total += REVIEW_WEIGHT;
    }

    total
}

/// Renders the score with its fixed `/100` suffix; callers parsing the
/// numeric prefix back out is supported usage.
#[must_use]
pub fn format_score(score: u8) -> String {
    format!("{score}/100")
}
