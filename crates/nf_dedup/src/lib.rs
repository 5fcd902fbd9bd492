pub mod detector;
pub mod fuzzy;
pub mod tfidf;
pub mod urls;

pub use detector::DuplicateDetector;

pub mod prelude {
    pub use super::detector::DuplicateDetector;
    pub use nf_core::{Article, Error, Result};
}
