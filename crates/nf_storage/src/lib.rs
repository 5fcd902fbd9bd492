pub mod backends;

pub use backends::{MemoryFingerprintStore, SqliteFingerprintStore};

pub mod prelude {
    pub use super::backends::{MemoryFingerprintStore, SqliteFingerprintStore};
    pub use nf_core::{FingerprintStore, Result};
}
