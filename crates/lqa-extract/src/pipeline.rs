//! Per-page extraction pipeline.
//!
//! Control flow per page: classify first (terminal classifications never
//! reach field extraction), scan inline scripts once, then run every
//! field's strategy chain — structured data from the scan output first,
//! element-tree selectors second, raw-source regex last, first
//! non-sentinel value wins. Strategy failures are recovered per field;
//! the pipeline itself never aborts partway, so the returned record is
//! always total.

use regex::Regex;
use scraper::Html;
use serde_json::Value;

use lqa_core::{ExtractionOutcome, ImageVariant, Record, Video, NONE};

use crate::classify::{classify, Classification};
use crate::dom;
use crate::embedded::{self, EmbeddedData};
use crate::error::ExtractError;
use crate::normalize::{decode_entities, marketplace_of, page_host, parse_rating_value, video_domain};
use crate::score;

/// Grouping tag selecting listing-level videos inside the gold mine
/// (other groups carry review and ad videos).
const VIDEO_GROUP: &str = "IB_G1";

/// A collaborator-supplied rendered page: address, window title, and the
/// serialized document source. The pipeline owns no fetching or
/// rendering.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: String,
    pub title: String,
    pub html: String,
}

impl RenderedPage {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            html: html.into(),
        }
    }
}

/// Processes one page end to end. Always returns exactly one outcome;
/// never a partial record and never a panic on malformed page content.
#[must_use]
pub fn extract(page: &RenderedPage) -> ExtractionOutcome {
    if page.html.trim().is_empty() {
        let err = ExtractError::EmptySource {
            url: page.url.clone(),
        };
        tracing::warn!(url = %page.url, error = %err, "extraction failed");
        return ExtractionOutcome::Failure {
            url: page.url.clone(),
            message: err.to_string(),
        };
    }

    let document = Html::parse_document(&page.html);

    match classify(&page.title, &document) {
        Classification::Blocked(reason) => {
            tracing::warn!(url = %page.url, reason, "page blocked, skipping extraction");
            return ExtractionOutcome::Blocked {
                url: page.url.clone(),
                title: page.title.clone(),
                reason,
            };
        }
        Classification::NotFound => {
            tracing::debug!(url = %page.url, "listing not found");
            return ExtractionOutcome::NotFound {
                url: page.url.clone(),
                title: page.title.clone(),
            };
        }
        Classification::Continue => {}
    }

    let scripts = dom::script_bodies(&document);
    let scanned = embedded::scan(&scripts);

    let record = extract_record(&document, page, &scanned);
    tracing::debug!(
        url = %page.url,
        asin = %record.media_asin,
        score = record.quality_score,
        "extracted record"
    );
    ExtractionOutcome::Success(Box::new(record))
}

fn extract_record(document: &Html, page: &RenderedPage, scanned: &EmbeddedData) -> Record {
    let raw = page.html.as_str();
    let gold = scanned.gold_mine.as_ref();
    let host = page_host(&page.url).unwrap_or_default();

    let mut record = Record {
        url: page.url.clone(),
        page_title: page.title.clone(),
        ..Record::default()
    };
    if !host.is_empty() {
        record.marketplace = marketplace_of(host);
    }

    // Identity.
    if let Some(gold) = gold {
        record.media_asin = string_field(gold, "mediaAsin");
        record.parent_asin = string_field(gold, "parentAsin");
        let title = gold
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&page.title);
        record.meta_title = decode_entities(title).replace('\\', "");
    } else {
        record.media_asin = capture(raw, r#""mediaAsin"\s*:\s*"([^"]+)""#).unwrap_or_else(none);
        record.parent_asin = capture(raw, r#""parentAsin"\s*:\s*"([^"]+)""#).unwrap_or_else(none);
        record.meta_title = dom::meta_title(document).unwrap_or_else(|| page.title.clone());
    }

    // Media gallery.
    record.images = images(scanned, gold, raw);

    // Variation family.
    let variations = gold
        .and_then(gold_variations)
        .unwrap_or_else(|| source_variations(raw));
    record.variation_exists = variations.exists;
    record.variation_theme = variations.theme;
    record.variation_count = variations.count;
    record.variation_family = variations.family;

    // Videos.
    record.videos = gold
        .and_then(|gold| gold_videos(gold, host))
        .unwrap_or_else(|| source_videos(raw, host));

    // Commercial.
    record.display_price = capture(raw, r#""priceAmount"\s*:\s*([\d.]+)"#).unwrap_or_else(none);
    record.brand = dom::brand(document)
        .or_else(|| {
            capture(
                raw,
                r#"(?s)rhapsodyARIngressViewModel\s*=\s*\{.*?brand\s*:\s*["']([^"']+)["']"#,
            )
            .map(|brand| brand.trim().to_string())
        })
        .unwrap_or_else(none);
    record.stock_status = dom::stock_status(document, &record.display_price);
    record.sold_by = dom::sold_by(document).unwrap_or_else(none);

    // Reputation.
    record.rating_raw = dom::rating_raw(document).unwrap_or_else(none);
    record.rating_value = parse_rating_value(&record.rating_raw);
    if let Some((reviews_raw, review_count)) = dom::reviews(document) {
        record.reviews_raw = reviews_raw;
        record.review_count = review_count;
    }

    // Ranking and delivery.
    record.bsr = dom::best_sellers_rank(document).unwrap_or_else(none);
    let (free, paid, prime) = dom::delivery_dates(document);
    record.free_delivery_date = free;
    record.paid_delivery_date = paid;
    record.prime_or_fastest_delivery_date = prime;
    record.delivery_location = dom::delivery_location(document).unwrap_or_else(none);

    // Content.
    record.bullets = dom::bullets(document);
    record.bullet_count = record.bullets.len();
    if let Some(description) = dom::description(document) {
        record.description_length = description.chars().count();
        record.description = description;
    }

    // Module imagery.
    record.brand_story_images = dom::brand_story_images(document);
    record.aplus_images = dom::aplus_images(document);

    // Derived flags.
    record.has_video = !record.videos.is_empty();
    record.has_bullets = record.bullets.join(" | ").len() > 5;
    record.has_description = record.description != NONE && record.description_length > 5;
    record.has_aplus = !record.aplus_images.is_empty();
    record.has_brand_story = !record.brand_story_images.is_empty();

    record.quality_score = score::score(&record);
    record
}

fn none() -> String {
    NONE.to_string()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(none, str::to_string)
}

/// First capture group of `pattern` over the raw page source.
fn capture(raw: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).expect("valid regex");
    re.captures(raw)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Image gallery strategy order: scanned image block, gold-mine
/// `colorImages` map, raw-source gallery array.
fn images(scanned: &EmbeddedData, gold: Option<&Value>, raw: &str) -> Vec<ImageVariant> {
    if let Some(block) = &scanned.image_block {
        return block.clone();
    }

    if let Some(color_images) = gold.and_then(|g| g.get("colorImages")).and_then(Value::as_object) {
        let mut items = Vec::new();
        for (variant, entries) in color_images {
            for entry in entries.as_array().into_iter().flatten() {
                items.push(ImageVariant {
                    variant: variant.clone(),
                    hi_res: cleaned_url_field(entry, "hiRes"),
                    large: cleaned_url_field(entry, "large"),
                    thumb: None,
                });
            }
        }
        if !items.is_empty() {
            return items;
        }
    }

    source_images(raw)
}

fn source_images(raw: &str) -> Vec<ImageVariant> {
    let re = Regex::new(r#"(?s)\[\s*\{"hiRes":.*?"variant":.*?\}\]"#).expect("valid regex");
    let Some(found) = re.find(raw) else {
        return Vec::new();
    };
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(found.as_str()) else {
        tracing::debug!("raw gallery array failed to parse");
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| ImageVariant {
            variant: entry
                .get("variant")
                .and_then(Value::as_str)
                .unwrap_or(NONE)
                .to_string(),
            hi_res: cleaned_url_field(entry, "hiRes"),
            large: cleaned_url_field(entry, "large"),
            thumb: None,
        })
        .collect()
}

fn cleaned_url_field(entry: &Value, key: &str) -> String {
    crate::normalize::clean_image_url(entry.get(key).and_then(Value::as_str).unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Variation family
// ---------------------------------------------------------------------------

struct Variations {
    exists: bool,
    theme: String,
    count: String,
    family: String,
}

/// Structured strategy: the gold mine's `colorToAsin` map is the sibling
/// family, `visualDimensions` names the theme.
fn gold_variations(gold: &Value) -> Option<Variations> {
    let color_to_asin = gold.get("colorToAsin")?.as_object()?;
    if color_to_asin.is_empty() {
        return None;
    }

    let asins: Vec<&str> = color_to_asin
        .values()
        .map(|entry| entry.get("asin").and_then(Value::as_str).unwrap_or(NONE))
        .collect();

    let theme = gold
        .get("visualDimensions")
        .and_then(Value::as_array)
        .filter(|dims| !dims.is_empty())
        .map_or_else(none, |dims| {
            dims.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        });

    Some(Variations {
        exists: true,
        theme,
        count: color_to_asin.len().to_string(),
        family: format!("[{}]", asins.join(", ")),
    })
}

/// Raw-source strategy for pages without a gold mine: dimension and
/// count markers, and the compact-reserialized
/// `dimensionValuesDisplayData` map as the family encoding.
fn source_variations(raw: &str) -> Variations {
    let theme = capture(raw, r#""dimensions"\s*:\s*(\[[^\]]*\])"#);
    let exists = theme.is_some();
    let count = capture(raw, r#""num_total_variations"\s*:\s*(\d+)"#).unwrap_or_else(none);

    let family = capture(raw, r#"(?s)"dimensionValuesDisplayData"\s*:\s*(\{.*?\})\s*,"#)
        .map_or_else(none, |blob| {
            serde_json::from_str::<Value>(&blob).map_or_else(
                |err| {
                    tracing::debug!(error = %err, "variation family blob failed to parse");
                    "Error Parsing Family Data".to_string()
                },
                |value| serde_json::to_string(&value).expect("JSON value re-serializes"),
            )
        });

    Variations {
        exists,
        theme: theme.unwrap_or_else(none),
        count,
        family,
    }
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

/// Structured strategy: gold-mine videos of the listing group, with URLs
/// synthesized from the marketplace domain and the media object id.
fn gold_videos(gold: &Value, host: &str) -> Option<Vec<Video>> {
    let entries = gold.get("videos")?.as_array()?;
    let domain = video_domain(host);

    let videos: Vec<Video> = entries
        .iter()
        .filter(|v| v.get("groupType").and_then(Value::as_str) == Some(VIDEO_GROUP))
        .filter_map(|v| {
            let media_object_id = v.get("mediaObjectId").and_then(Value::as_str)?;
            Some(Video {
                title: v.get("title").and_then(Value::as_str).map(str::to_string),
                url: format!("https://www.amazon.{domain}/vdp/{media_object_id}"),
                duration_seconds: v.get("durationSeconds").and_then(Value::as_u64),
                language_code: v
                    .get("languageCode")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect();

    Some(videos)
}

/// Raw-source strategy: player holder markers, first-seen order, deduplicated.
fn source_videos(raw: &str, host: &str) -> Vec<Video> {
    let re = Regex::new(r#""holderId"\s*:\s*"holder([^"]+)""#).expect("valid regex");
    let domain = video_domain(host);

    let mut seen: Vec<&str> = Vec::new();
    for cap in re.captures_iter(raw) {
        if let Some(id) = cap.get(1) {
            if !seen.contains(&id.as_str()) {
                seen.push(id.as_str());
            }
        }
    }

    seen.into_iter()
        .map(|id| Video {
            title: None,
            url: format!("https://www.amazon.{domain}/vdp/{id}"),
            duration_seconds: None,
            language_code: None,
        })
        .collect()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
