//! Embedded structured-data scanning over inline script bodies.
//!
//! Two independent best-effort strategies, each anchored on a known
//! marker substring:
//!
//! - the **gold mine**: a `jQuery.parseJSON('…')` call wrapping the
//!   listing's authoritative metadata blob (ASINs, title, variation map,
//!   videos, per-variant image sets);
//! - the **image block**: a `'colorImages': { 'initial': […] }` literal
//!   carrying the gallery for the currently selected variant.
//!
//! A miss on either strategy yields `None` for that slot, never an
//! error; field extraction then falls through to the DOM and raw-text
//! tiers.

use regex::Regex;
use serde_json::Value;

use lqa_core::ImageVariant;

use crate::error::ExtractError;
use crate::locate::locate_slice;
use crate::normalize::clean_image_url;

/// Marker keys at least one of which a genuine gold-mine blob carries.
const GOLD_MARKERS: [&str; 2] = ["colorToAsin", "mediaAsin"];

/// Output of one scan over a page's script bodies.
#[derive(Debug, Default)]
pub struct EmbeddedData {
    pub gold_mine: Option<Value>,
    pub image_block: Option<Vec<ImageVariant>>,
}

/// Scans all inline script bodies once. Each slot stops at its first
/// successful producer; a failed candidate falls through to later bodies.
#[must_use]
pub fn scan(script_bodies: &[String]) -> EmbeddedData {
    EmbeddedData {
        gold_mine: find_gold_mine(script_bodies),
        image_block: find_image_block(script_bodies),
    }
}

fn find_gold_mine(script_bodies: &[String]) -> Option<Value> {
    let call_re = Regex::new(r"(?s)jQuery\.parseJSON\(\s*'(.*?)'\s*\)").expect("valid regex");

    for body in script_bodies {
        if !body.contains("jQuery.parseJSON")
            || !GOLD_MARKERS.iter().any(|marker| body.contains(marker))
        {
            continue;
        }
        let Some(raw) = call_re.captures(body).and_then(|cap| cap.get(1)) else {
            continue;
        };
        let raw = raw.as_str();

        // The payload arrives single-quoted with backslash-escaped quotes.
        // Parse the unescaped form first and retry with the raw capture:
        // some templates ship the blob pre-unescaped.
        let unescaped = raw.replace(r"\'", "'").replace("\\\"", "\"");
        match parse_blob(&unescaped, "gold mine").or_else(|_| parse_blob(raw, "gold mine")) {
            Ok(value) => {
                tracing::debug!(bytes = raw.len(), "extracted gold-mine blob");
                return Some(value);
            }
            Err(err) => {
                tracing::debug!(error = %err, "gold-mine candidate failed to parse");
            }
        }
    }
    None
}

fn find_image_block(script_bodies: &[String]) -> Option<Vec<ImageVariant>> {
    for body in script_bodies {
        if !body.contains("colorImages") || !body.contains("initial") {
            continue;
        }
        let Some(anchor) = find_quoted(body, "colorImages", 0) else {
            continue;
        };
        let Some(label) = find_quoted(body, "initial", anchor) else {
            continue;
        };
        let Some(array) = locate_slice(body, '[', ']', label) else {
            // Truncated script content; the array never closes.
            continue;
        };

        match parse_blob(array, "image block") {
            Ok(Value::Array(entries)) => {
                let images: Vec<ImageVariant> = entries.iter().map(image_entry).collect();
                tracing::debug!(count = images.len(), "extracted image block");
                return Some(images);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(error = %err, "image-block candidate failed to parse");
            }
        }
    }
    None
}

fn parse_blob(raw: &str, context: &'static str) -> Result<Value, ExtractError> {
    serde_json::from_str(raw).map_err(|source| ExtractError::EmbeddedJson { context, source })
}

/// Finds the byte offset of `'key'` or `"key"` at or after `from`.
fn find_quoted(body: &str, key: &str, from: usize) -> Option<usize> {
    let tail = body.get(from..)?;
    let single = format!("'{key}'");
    let double = format!("\"{key}\"");
    tail.find(&single)
        .or_else(|| tail.find(&double))
        .map(|pos| from + pos)
}

fn image_entry(entry: &Value) -> ImageVariant {
    let str_of = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or_default();
    ImageVariant {
        variant: entry
            .get("variant")
            .and_then(Value::as_str)
            .unwrap_or("MAIN")
            .to_string(),
        hi_res: clean_image_url(str_of("hiRes")),
        large: clean_image_url(str_of("large")),
        thumb: Some(clean_image_url(str_of("thumb"))),
    }
}

#[cfg(test)]
#[path = "embedded_test.rs"]
mod tests;
