use thiserror::Error;

/// Failures that prevent any extraction for a page.
///
/// Per-field and per-strategy problems are never surfaced through this
/// type — they are recovered locally and the field falls back to its
/// sentinel. This covers only whole-page conditions.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page source is empty for {url}")]
    EmptySource { url: String },

    #[error("embedded JSON parse error in {context}: {source}")]
    EmbeddedJson {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
