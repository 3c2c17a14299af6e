//! Terminal page classification, run before any field extraction.

use scraper::{Html, Selector};

/// Title markers for the anti-automation challenge page.
const CAPTCHA_TITLE_MARKER: &str = "Robot Check";
/// Title marker for the not-found page.
const NOT_FOUND_TITLE_MARKER: &str = "Page Not Found";

/// Outcome of pre-extraction inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Anti-automation challenge; extraction must not be attempted.
    Blocked(String),
    /// The address does not correspond to an existing listing.
    NotFound,
    /// A live listing; proceed to field extraction.
    Continue,
}

/// Inspects title and DOM markers and short-circuits blocked/not-found
/// pages. A terminal classification means the caller returns only
/// `{url, title, classification}` — never a partial record.
#[must_use]
pub fn classify(title: &str, document: &Html) -> Classification {
    let captcha_form =
        Selector::parse("form[action*='/errors/validateCaptcha']").expect("valid selector");
    if title.contains(CAPTCHA_TITLE_MARKER) || document.select(&captcha_form).next().is_some() {
        return Classification::Blocked("CAPTCHA".to_string());
    }

    let not_found_image = Selector::parse("img[alt*='Dogs of Amazon']").expect("valid selector");
    let not_found_link = Selector::parse("a[href*='/ref=cs_404_logo']").expect("valid selector");
    if title.contains(NOT_FOUND_TITLE_MARKER)
        || document.select(&not_found_image).next().is_some()
        || document.select(&not_found_link).next().is_some()
    {
        return Classification::NotFound;
    }

    Classification::Continue
}
