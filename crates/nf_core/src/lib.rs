pub mod config;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod store;
pub mod types;

pub use config::EngineConfig;
pub use error::Error;
pub use store::FingerprintStore;
pub use types::{
    Article, DuplicateDecision, DuplicateLayer, Fingerprint, FingerprintRecord, QualityBreakdown,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::config::EngineConfig;
    pub use super::store::FingerprintStore;
    pub use super::types::{Article, Fingerprint, FingerprintRecord};
    pub use super::{Error, Result};
}
