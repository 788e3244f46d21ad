//! Error types shared by the storage and lookup layers.
//!
//! Only genuinely exceptional conditions surface as `Err`. A phrase or
//! bigram key that is simply absent is reported through `Option` or the
//! dedicated `NoSubIndex`/`NoItem` variants so that lookup code can treat
//! it as a skip rather than a failure.

use std::path::PathBuf;

/// Result type used throughout the crate.
pub type Result<T, E = HanyuError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum HanyuError {
    /// Underlying I/O failure. Fatal when raised while loading system
    /// tables during context construction.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A binary table carries the wrong magic or format tag. User files
    /// in this state are wiped and rebuilt; system files in this state
    /// are a packaging error.
    #[error("format tag mismatch in {0}")]
    FormatMismatch(PathBuf),

    /// A table section failed to decode.
    #[error("corrupt {what} table: {detail}")]
    Corrupt {
        what: &'static str,
        detail: String,
    },

    /// The sub-phrase partition decoded from a token's high byte is not
    /// loaded. Benign; lookup callers skip the token.
    #[error("phrase partition {0} is not loaded")]
    NoSubIndex(u8),

    /// The partition is loaded but holds no item for the token. Benign.
    #[error("token {0:#010x} has no phrase item")]
    NoItem(u32),
}

impl HanyuError {
    pub(crate) fn corrupt<D: std::fmt::Display>(what: &'static str, detail: D) -> Self {
        Self::Corrupt {
            what,
            detail: detail.to_string(),
        }
    }

    /// True for the benign not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSubIndex(_) | Self::NoItem(_))
    }
}
