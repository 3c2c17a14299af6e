//! Canonical extraction output types.
//!
//! ## Sentinel policy
//! A [`Record`] is never partial: every field is always present with a
//! defined value. Missing data is encoded, not omitted — `"none"` for
//! strings, `0` for counts, `false` for flags, an empty `Vec` for
//! collections. [`Record::default`] produces the all-sentinel record, and
//! extraction only ever overwrites fields it found real data for.
//!
//! ## Raw vs. parsed fields
//! For rating and review data the page text is kept verbatim
//! (`rating_raw`, `reviews_raw`) alongside the parsed forms
//! (`rating_value`, `review_count`). Change detection compares the raw
//! forms; the parsed forms are derived and excluded from comparison.

use serde::{Deserialize, Serialize};

/// Shared sentinel for "no data" in string-typed fields.
pub const NONE: &str = "none";

fn none_string() -> String {
    NONE.to_string()
}

/// Stock availability as read from the buy box.
///
/// `Custom` carries free-form buy-box text such as
/// `"No featured offers available"`, which some listings show instead of a
/// plain in/out-of-stock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
    Custom(String),
}

impl StockStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out Of Stock",
            Self::Unknown => "Unknown / No Price",
            Self::Custom(text) => text,
        }
    }
}

impl From<String> for StockStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "In Stock" => Self::InStock,
            "Out Of Stock" => Self::OutOfStock,
            "Unknown / No Price" => Self::Unknown,
            _ => Self::Custom(s),
        }
    }
}

impl From<StockStatus> for String {
    fn from(status: StockStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the image-variant gallery.
///
/// URLs are stored with any resolution/format suffix token stripped
/// (e.g. `image._AC_SL1500_.jpg` becomes `image.jpg`), so the same asset
/// compares equal across page templates that request different sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Gallery slot name (`"MAIN"`, `"PT01"`, a colour name, …).
    pub variant: String,
    #[serde(default = "none_string")]
    pub hi_res: String,
    #[serde(default = "none_string")]
    pub large: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// One product video.
///
/// The URL is always synthesized from the marketplace domain and the media
/// object identifier — never taken as a literal href from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// The canonical structured record for one product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    // Identity.
    pub url: String,
    /// The document title as rendered (window title).
    pub page_title: String,
    /// The listing title from structured data or the title meta tag.
    pub meta_title: String,
    pub media_asin: String,
    pub parent_asin: String,
    /// Page hostname minus a leading `www.`.
    pub marketplace: String,

    // Commercial.
    pub brand: String,
    /// Decimal string as found in the page source, or `"none"`.
    pub display_price: String,
    pub stock_status: StockStatus,
    pub sold_by: String,

    // Reputation.
    pub rating_raw: String,
    pub rating_value: f32,
    pub reviews_raw: String,
    pub review_count: u64,

    // Ranking. Pipe-joined multi-category ranks, or `"none"`.
    pub bsr: String,

    // Delivery.
    pub free_delivery_date: String,
    pub paid_delivery_date: String,
    pub prime_or_fastest_delivery_date: String,
    pub delivery_location: String,

    // Content.
    pub bullets: Vec<String>,
    pub bullet_count: usize,
    pub description: String,
    pub description_length: usize,

    // Variation family.
    pub variation_exists: bool,
    pub variation_theme: String,
    /// Integer rendered as a string, or `"none"`.
    pub variation_count: String,
    /// A bracketed sibling-ASIN list or a compact theme→value JSON map.
    pub variation_family: String,

    // Media.
    pub images: Vec<ImageVariant>,
    pub videos: Vec<Video>,
    pub brand_story_images: Vec<String>,
    pub aplus_images: Vec<String>,

    // Derived flags, computed once after extraction.
    pub has_video: bool,
    pub has_bullets: bool,
    pub has_description: bool,
    pub has_aplus: bool,
    pub has_brand_story: bool,

    /// Composite quality score in `[0, 100]`.
    pub quality_score: u8,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            url: none_string(),
            page_title: none_string(),
            meta_title: none_string(),
            media_asin: none_string(),
            parent_asin: none_string(),
            marketplace: none_string(),
            brand: none_string(),
            display_price: none_string(),
            stock_status: StockStatus::Unknown,
            sold_by: none_string(),
            rating_raw: none_string(),
            rating_value: 0.0,
            reviews_raw: none_string(),
            review_count: 0,
            bsr: none_string(),
            free_delivery_date: none_string(),
            paid_delivery_date: none_string(),
            prime_or_fastest_delivery_date: none_string(),
            delivery_location: none_string(),
            bullets: Vec::new(),
            bullet_count: 0,
            description: none_string(),
            description_length: 0,
            variation_exists: false,
            variation_theme: none_string(),
            variation_count: none_string(),
            variation_family: none_string(),
            images: Vec::new(),
            videos: Vec::new(),
            brand_story_images: Vec::new(),
            aplus_images: Vec::new(),
            has_video: false,
            has_bullets: false,
            has_description: false,
            has_aplus: false,
            has_brand_story: false,
            quality_score: 0,
        }
    }
}

/// Tagged result of one page's processing. Exactly one variant per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionOutcome {
    /// The page was a live listing and a full record was extracted.
    Success(Box<Record>),
    /// An anti-automation challenge was detected; terminal, no record.
    Blocked {
        url: String,
        title: String,
        reason: String,
    },
    /// The page does not correspond to an existing listing; terminal.
    NotFound { url: String, title: String },
    /// Nothing could be extracted at all (unusable document).
    Failure { url: String, message: String },
}

impl ExtractionOutcome {
    /// The record, when extraction succeeded.
    #[must_use]
    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Success(record) => Some(record),
            _ => None,
        }
    }

    /// The page address this outcome belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Success(record) => &record.url,
            Self::Blocked { url, .. } | Self::NotFound { url, .. } | Self::Failure { url, .. } => {
                url
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_all_sentinels() {
        let record = Record::default();
        assert_eq!(record.media_asin, NONE);
        assert_eq!(record.display_price, NONE);
        assert_eq!(record.stock_status, StockStatus::Unknown);
        assert_eq!(record.review_count, 0);
        assert!(record.bullets.is_empty());
        assert!(!record.has_video);
        assert_eq!(record.quality_score, 0);
    }

    #[test]
    fn record_serializes_every_field() {
        let value = serde_json::to_value(Record::default()).unwrap();
        let map = value.as_object().unwrap();
        // Totality: absence of data is an encoded value, never a missing key.
        assert_eq!(map.get("media_asin").unwrap(), NONE);
        assert_eq!(map.get("variation_exists").unwrap(), false);
        assert_eq!(map.get("stock_status").unwrap(), "Unknown / No Price");
        assert!(map.get("images").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn stock_status_round_trips_through_strings() {
        for status in [
            StockStatus::InStock,
            StockStatus::OutOfStock,
            StockStatus::Unknown,
            StockStatus::Custom("No featured offers available".to_string()),
        ] {
            let s = String::from(status.clone());
            assert_eq!(StockStatus::from(s), status);
        }
    }

    #[test]
    fn outcome_url_is_available_for_all_variants() {
        let record = Record {
            url: "https://www.amazon.com/dp/B000TEST00".to_string(),
            ..Record::default()
        };
        let success = ExtractionOutcome::Success(Box::new(record));
        assert_eq!(success.url(), "https://www.amazon.com/dp/B000TEST00");

        let blocked = ExtractionOutcome::Blocked {
            url: "https://www.amazon.com/dp/B000TEST00".to_string(),
            title: "Captcha Block".to_string(),
            reason: "CAPTCHA".to_string(),
        };
        assert!(blocked.record().is_none());
        assert_eq!(blocked.url(), "https://www.amazon.com/dp/B000TEST00");
    }
}
