pub mod scorer;

pub use scorer::QualityScorer;

pub mod prelude {
    pub use super::scorer::QualityScorer;
    pub use nf_core::{Article, QualityBreakdown, Result};
}
