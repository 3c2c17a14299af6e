//! Element-tree extraction strategies.
//!
//! Each extractor queries the rendered tree with the selector chain known
//! to match its field's page layouts, primary selector first and
//! documented fallbacks after. All extractors are total: a miss returns
//! the field's sentinel, never an error.

use scraper::{ElementRef, Html, Selector};

use lqa_core::{StockStatus, NONE};

use crate::normalize::{
    clean_image_url, clean_rank_text, clean_review_text, review_count_from, strip_brand_decorations,
    strip_zero_width,
};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    document.select(&selector(css)).next()
}

pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// All inline script bodies, in document order.
pub(crate) fn script_bodies(document: &Html) -> Vec<String> {
    document
        .select(&selector("script"))
        .map(|script| script.text().collect::<String>())
        .collect()
}

/// The `meta[name=title]` content, used when no gold mine is present.
pub(crate) fn meta_title(document: &Html) -> Option<String> {
    first(document, "meta[name='title']")
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Byline brand, stripped of "Visit the … Store"-style decorations.
pub(crate) fn brand(document: &Html) -> Option<String> {
    let el = first(document, "a#bylineInfo").or_else(|| first(document, "div#bylineInfo"))?;
    let brand = strip_brand_decorations(&text_of(el));
    if brand.is_empty() {
        None
    } else {
        Some(brand)
    }
}

/// Delivery-location text, with zero-width characters stripped.
/// Primary: the glow ingress line. Fallback: the contextual ingress
/// link's ARIA label (mobile-ish templates).
pub(crate) fn delivery_location(document: &Html) -> Option<String> {
    let from_line = first(document, "div#glow-ingress-block > span#glow-ingress-line2")
        .map(text_of)
        .filter(|text| !text.is_empty());
    let text = from_line.or_else(|| {
        first(document, "a#contextualIngressPtLink")
            .and_then(|el| el.value().attr("aria-label"))
            .map(str::to_string)
    })?;

    let cleaned = strip_zero_width(&text);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Buy-box stock state. The out-of-stock buy box and the
/// no-featured-offers popover are checked before the generic
/// availability span; with no signal at all the state degrades to
/// `Unknown` only when there is also no price.
pub(crate) fn stock_status(document: &Html, display_price: &str) -> StockStatus {
    if first(document, "div#outOfStockBuyBox_feature_div").is_some() {
        return StockStatus::OutOfStock;
    }

    if let Some(popover) = first(document, "div#a-popover-fod-cx-learnMore-popover-fodApi") {
        let text = popover
            .select(&selector("span.a-text-bold"))
            .next()
            .map(text_of)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "No featured offers available".to_string());
        return StockStatus::Custom(text);
    }

    if let Some(availability) = first(document, "#availability span") {
        let text = text_of(availability).to_lowercase();
        if text.contains("currently unavailable") || text.contains("out of stock") {
            return StockStatus::OutOfStock;
        }
        return StockStatus::InStock;
    }

    if display_price == NONE {
        StockStatus::Unknown
    } else {
        StockStatus::InStock
    }
}

/// Seller name from the offer-display chain, oldest templates last.
pub(crate) fn sold_by(document: &Html) -> Option<String> {
    let chain = [
        "div[class*='offer-display-feature-text'] > span[class*='offer-display-feature-text-message']",
        "div[data-csa-c-slot-id='odf-feature-text-desktop-merchant-info'] > div[class*='offer-display-feature-text']",
        "#sellerProfileTriggerId",
        "#merchant-info span",
        "#merchant-info",
    ];
    chain
        .iter()
        .find_map(|css| first(document, css).map(text_of).filter(|t| !t.is_empty()))
}

/// Raw rating text, e.g. `"4.5 out of 5 stars"`.
pub(crate) fn rating_raw(document: &Html) -> Option<String> {
    first(document, "a[class*='mvt-cm-cr-review-stars'] > span")
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Cleaned review text and the digit-only count parsed from it.
pub(crate) fn reviews(document: &Html) -> Option<(String, u64)> {
    let raw = first(document, "span#acrCustomerReviewText").map(text_of)?;
    let cleaned = clean_review_text(&raw);
    let count = review_count_from(&cleaned);
    Some((cleaned, count))
}

/// Best-Sellers-Rank, joined as `"main | sub | sub"`.
///
/// Primary layout: the bold "Best Sellers Rank" label inside a detail
/// list item — the main rank is the `li`'s direct text content (element
/// children like the bold label and the sub-category `ul` contribute
/// nothing), sub-ranks come from that `ul`. Fallback layout: the
/// `th`/`td` product-information table.
pub(crate) fn best_sellers_rank(document: &Html) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    let label = document
        .select(&selector("span.a-text-bold"))
        .find(|el| text_of(*el).contains("Best Sellers Rank"));
    if let Some(label) = label {
        if let Some(container) = label
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "li")
        {
            let wrapper = container
                .select(&selector("span.a-list-item"))
                .next()
                .unwrap_or(container);

            let mut main_text = String::new();
            for child in wrapper.children() {
                if let Some(text) = child.value().as_text() {
                    main_text.push_str(text);
                }
            }
            let cleaned = clean_rank_text(&main_text);
            if !cleaned.is_empty() {
                parts.push(cleaned);
            }

            if let Some(sub_list) = wrapper.select(&selector("ul")).next() {
                for item in sub_list.select(&selector("li")) {
                    let cleaned = clean_rank_text(&text_of(item));
                    if !cleaned.is_empty() {
                        parts.push(cleaned);
                    }
                }
            }
        }
    }

    if parts.is_empty() {
        let header = document
            .select(&selector("th"))
            .find(|th| text_of(*th).contains("Best Sellers Rank"));
        if let Some(header) = header {
            let cell = header
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|el| el.value().name() == "td");
            if let Some(cell) = cell {
                if let Some(sub_list) = cell.select(&selector("ul")).next() {
                    for item in sub_list.select(&selector("li")) {
                        let cleaned = clean_rank_text(&text_of(item));
                        if !cleaned.is_empty() {
                            parts.push(cleaned);
                        }
                    }
                } else {
                    let cleaned = clean_rank_text(&text_of(cell));
                    if !cleaned.is_empty() {
                        parts.push(cleaned);
                    }
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

/// Delivery promises from the unified delivery-experience spans:
/// `(free_delivery, paid_delivery, prime_or_fastest)`.
///
/// The primary span carries price and time data attributes; a price
/// containing any digit means paid delivery (`"<price> - <time>"`),
/// otherwise the time is a free-delivery date. The secondary span is the
/// Prime/fastest promise.
pub(crate) fn delivery_dates(document: &Html) -> (String, String, String) {
    let mut free = NONE.to_string();
    let mut paid = NONE.to_string();
    let mut prime = NONE.to_string();

    let primary = first(
        document,
        "span[data-csa-c-type='element'][data-csa-c-content-id='DEXUnifiedCXPDM']",
    );
    if let Some(primary) = primary {
        let price = primary.value().attr("data-csa-c-delivery-price");
        let time = primary.value().attr("data-csa-c-delivery-time");
        if let (Some(price), Some(time)) = (price, time) {
            if price.chars().any(|c| c.is_ascii_digit()) {
                paid = format!("{price} - {time}");
            } else {
                free = time.to_string();
            }
        }
    }

    let secondary = first(
        document,
        "span[data-csa-c-type='element'][data-csa-c-content-id='DEXUnifiedCXSDM']",
    );
    if let Some(time) = secondary.and_then(|el| el.value().attr("data-csa-c-delivery-time")) {
        prime = time.to_string();
    }

    (free, paid, prime)
}

/// Feature bullets. Primary: the quick-view bullet list; fallback: the
/// standard feature-bullets block and the product-facts expander.
pub(crate) fn bullets(document: &Html) -> Vec<String> {
    let primary = selector("div#pqv-feature-bullets > ul > li");
    let fallback = selector(
        "#feature-bullets li span.a-list-item, \
         div[id*='productFactsDesktopExpander'] > div > ul > li > span[class*='a-list-item']",
    );

    let mut items: Vec<String> = document
        .select(&primary)
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect();
    if items.is_empty() {
        items = document
            .select(&fallback)
            .map(text_of)
            .filter(|text| !text.is_empty())
            .collect();
    }
    items
}

/// Product description text with the block's own heading excluded.
/// Primary: the quick-view description; fallback: the standard block.
pub(crate) fn description(document: &Html) -> Option<String> {
    let el =
        first(document, "div#pqv-description").or_else(|| first(document, "div#productDescription"))?;
    let mut out = String::new();
    text_without_headings(el, &mut out);
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn text_without_headings(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() != "h2" {
                text_without_headings(child_el, out);
            }
        }
    }
}

/// Brand-story module images, lazy-load attribute preferred.
pub(crate) fn brand_story_images(document: &Html) -> Vec<String> {
    collect_images(document, "div[class='apm-brand-story-background-image'] > img")
}

/// A+ content module images.
pub(crate) fn aplus_images(document: &Html) -> Vec<String> {
    collect_images(document, "div[class*='aplus-module-wrapper'] > img")
}

fn collect_images(document: &Html, css: &str) -> Vec<String> {
    document
        .select(&selector(css))
        .filter_map(|img| {
            img.value()
                .attr("data-src")
                .or_else(|| img.value().attr("src"))
        })
        .map(clean_image_url)
        .collect()
}

#[cfg(test)]
#[path = "dom_test.rs"]
mod tests;
