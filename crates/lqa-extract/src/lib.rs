pub mod classify;
pub mod embedded;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod pipeline;
pub mod score;

mod dom;

pub use classify::{classify, Classification};
pub use embedded::EmbeddedData;
pub use error::ExtractError;
pub use pipeline::{extract, RenderedPage};
pub use score::{format_score, score};
