//! Text normalization applied across extraction strategies.
//!
//! Every rule here exists because some page template or locale emits the
//! dirty form: resolution suffixes inside image URLs, HTML entities in
//! structured-data titles, zero-width joiners in delivery-location text,
//! localized byline decorations around brand names, comma-as-decimal
//! rating text, and "(See Top 100)" parentheticals in rank lines.

use regex::Regex;

use lqa_core::NONE;

/// Strips the resolution/format suffix token from an image URL, e.g.
/// `…/61abc._AC_SL1500_.jpg` → `…/61abc.jpg`. `"none"`/empty passes
/// through as the sentinel so cleaned fields stay total.
#[must_use]
pub fn clean_image_url(url: &str) -> String {
    if url.is_empty() || url == NONE {
        return NONE.to_string();
    }
    let re = Regex::new(r"(?i)\._[A-Z0-9,._-]+(\.[a-z]+)$").expect("valid regex");
    re.replace(url, "$1").into_owned()
}

/// Decodes the HTML entities observed in structured-data titles.
///
/// Handles the common named entities plus numeric (`&#39;`) and hex
/// (`&#x27;`) forms. Unknown entities are left verbatim.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        // Entity names are short; a distant semicolon is not one.
        let Some(end) = rest.find(';').filter(|&end| end <= 10) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..end];

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    num.strip_prefix('x')
                        .or_else(|| num.strip_prefix('X'))
                        .map_or_else(|| num.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok())
                })
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Removes zero-width characters (and the literal `&zwnj;` some templates
/// leave undecoded) from delivery-location text.
#[must_use]
pub fn strip_zero_width(text: &str) -> String {
    text.replace(['\u{200b}', '\u{200c}', '\u{200d}'], "")
        .replace("&zwnj;", "")
        .trim()
        .to_string()
}

/// Strips localized byline decorations from a brand string:
/// `"Visit the ACME Store"` → `"ACME"`, `"Marque : ACME"` → `"ACME"`.
#[must_use]
pub fn strip_brand_decorations(brand: &str) -> String {
    let patterns = [
        r"(?i)^Visit the\s+",
        r"(?i)\s+Store$",
        r"(?i)^Brand\s*:\s*",
        r"(?i)^Marque\s*:\s*",
        r"(?i)^Marke\s*:\s*",
        r"(?i)^Marca\s*:\s*",
    ];
    let mut out = brand.to_string();
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        out = re.replace(&out, "").into_owned();
    }
    out.trim().to_string()
}

/// Parses the numeric prefix of a rating string (`"4,5 von 5 Sternen"` →
/// `4.5`), normalizing comma-as-decimal locales. Out-of-range or
/// unparseable input yields the `0.0` sentinel.
#[must_use]
pub fn parse_rating_value(raw: &str) -> f32 {
    if raw == NONE {
        return 0.0;
    }
    raw.split_whitespace()
        .next()
        .map(|token| token.replace(',', "."))
        .and_then(|token| token.parse::<f32>().ok())
        .filter(|value| (0.0..=5.0).contains(value))
        .unwrap_or(0.0)
}

/// Normalizes review-count text: drops parentheses, non-breaking spaces,
/// stray mojibake bytes and thousands separators, leaving a compact
/// digit-bearing string (`"(1.234)"` → `"1234"`).
#[must_use]
pub fn clean_review_text(raw: &str) -> String {
    raw.trim()
        .replace(['(', ')', '\u{a0}', 'Â', '.'], "")
        .replace("&nbsp;", "")
        .split_whitespace()
        .collect()
}

/// Digit-only review count from cleaned review text. `0` when no digits.
#[must_use]
pub fn review_count_from(cleaned: &str) -> u64 {
    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Cleans one Best-Sellers-Rank line: removes the "(See Top 100…)"
/// parenthetical and empty parens, strips a leading colon, collapses
/// whitespace.
#[must_use]
pub fn clean_rank_text(text: &str) -> String {
    let see_top = Regex::new(r"(?i)\(.*?See Top 100.*?\)").expect("valid regex");
    let empty_parens = Regex::new(r"\(\s*\)").expect("valid regex");
    let leading_colon = Regex::new(r"^:\s*").expect("valid regex");

    let cleaned = see_top.replace_all(text, "");
    let cleaned = empty_parens.replace_all(&cleaned, "");
    let cleaned = leading_colon.replace(cleaned.trim(), "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the hostname from an absolute URL without a URL parser;
/// `https://www.amazon.de/dp/X` → `www.amazon.de`.
#[must_use]
pub fn page_host(url: &str) -> Option<&str> {
    let scheme_split = url.find("://")?;
    let remainder = &url[scheme_split + 3..];
    let host_end = remainder
        .find(['/', '?', '#'])
        .unwrap_or(remainder.len());
    let host = &remainder[..host_end];
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Marketplace name: hostname minus a leading `www.`.
#[must_use]
pub fn marketplace_of(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Marketplace TLD part used for video URL synthesis:
/// `www.amazon.co.uk` → `co.uk`. Hosts outside the expected shape pass
/// through unchanged, mirroring a no-op prefix replacement.
#[must_use]
pub fn video_domain(host: &str) -> &str {
    host.strip_prefix("www.amazon.").unwrap_or(host)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
