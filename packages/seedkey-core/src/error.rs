//! # Error Handling
//!
//! This module provides the error type shared by every seedkey operation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Mnemonic Errors (100-199)                                         │
//! │  │   ├── InvalidMnemonic       - Wordlist or checksum failure          │
//! │  │   └── InvalidStrength       - Entropy not 128 or 256 bits           │
//! │  │                                                                      │
//! │  ├── Derivation Errors (200-299)                                       │
//! │  │   ├── InvalidPath           - Missing `m/` or malformed segment     │
//! │  │   ├── InvalidKeyCount       - Count outside 1..=MAX_KEY_COUNT       │
//! │  │   ├── UnsupportedKeyType    - Key material of unusable length       │
//! │  │   └── KeyDerivationFailed   - Primitive failure (should not happen) │
//! │  │                                                                      │
//! │  ├── Encoding Errors (300-399)                                         │
//! │  │   └── InvalidKeyFormat      - Markers, base64 or payload size       │
//! │  │                                                                      │
//! │  └── Verification Errors (400-499)                                     │
//! │      └── PairMismatch          - Public and private do not correspond  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation is pure, so no error is transient: a caller fixes the
//! input and calls again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for seedkey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for seedkey
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Mnemonic Errors (100-199)
    // ========================================================================

    /// The phrase is not a valid BIP39 mnemonic
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Entropy strength is not one of the supported sizes
    #[error("Invalid strength: {0} bits (expected 128 or 256)")]
    InvalidStrength(usize),

    // ========================================================================
    // Derivation Errors (200-299)
    // ========================================================================

    /// Derivation path or path template is malformed
    #[error("Invalid derivation path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// Requested number of keys is out of range
    #[error("Invalid key count {0}: must be between 1 and {max}", max = crate::config::MAX_KEY_COUNT)]
    InvalidKeyCount(usize),

    /// Key material cannot be turned into an Ed25519 key pair
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// A cryptographic primitive rejected its input
    #[error("Failed to derive keys: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Encoding Errors (300-399)
    // ========================================================================

    /// Key text could not be decoded
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    // ========================================================================
    // Verification Errors (400-499)
    // ========================================================================

    /// Decoded public and private keys do not belong together
    #[error("Public key does not match private key")]
    PairMismatch,
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Mnemonic
    /// - 200-299: Derivation
    /// - 300-399: Encoding
    /// - 400-499: Verification
    pub fn code(&self) -> i32 {
        match self {
            // Mnemonic (100-199)
            Error::InvalidMnemonic(_) => 100,
            Error::InvalidStrength(_) => 101,

            // Derivation (200-299)
            Error::InvalidPath { .. } => 200,
            Error::InvalidKeyCount(_) => 201,
            Error::UnsupportedKeyType(_) => 202,
            Error::KeyDerivationFailed(_) => 203,

            // Encoding (300-399)
            Error::InvalidKeyFormat(_) => 300,

            // Verification (400-499)
            Error::PairMismatch => 400,
        }
    }

    /// The inspectable kind of this error, without its message
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidMnemonic(_) => ErrorKind::InvalidMnemonic,
            Error::InvalidStrength(_) => ErrorKind::InvalidStrength,
            Error::InvalidPath { .. } => ErrorKind::InvalidPath,
            Error::InvalidKeyCount(_) => ErrorKind::InvalidKeyCount,
            Error::UnsupportedKeyType(_) => ErrorKind::UnsupportedKeyType,
            Error::KeyDerivationFailed(_) => ErrorKind::KeyDerivationFailed,
            Error::InvalidKeyFormat(_) => ErrorKind::InvalidKeyFormat,
            Error::PairMismatch => ErrorKind::PairMismatch,
        }
    }

    /// Check if this error requires the user to correct their input
    pub fn requires_user_action(&self) -> bool {
        !matches!(self, Error::KeyDerivationFailed(_))
    }
}

/// Error kinds as plain tags, for results that carry failures as data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`Error::InvalidMnemonic`]
    InvalidMnemonic,
    /// See [`Error::InvalidStrength`]
    InvalidStrength,
    /// See [`Error::InvalidPath`]
    InvalidPath,
    /// See [`Error::InvalidKeyCount`]
    InvalidKeyCount,
    /// See [`Error::UnsupportedKeyType`]
    UnsupportedKeyType,
    /// See [`Error::KeyDerivationFailed`]
    KeyDerivationFailed,
    /// See [`Error::InvalidKeyFormat`]
    InvalidKeyFormat,
    /// See [`Error::PairMismatch`]
    PairMismatch,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidMnemonic("x".into()).code(), 100);
        assert_eq!(Error::InvalidStrength(192).code(), 101);
        assert_eq!(Error::invalid_path("44'/0'", "missing m/").code(), 200);
        assert_eq!(Error::InvalidKeyFormat("x".into()).code(), 300);
        assert_eq!(Error::PairMismatch.code(), 400);
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::PairMismatch.kind(), ErrorKind::PairMismatch);
        assert_eq!(
            Error::invalid_path("x", "y").kind(),
            ErrorKind::InvalidPath
        );
        assert_eq!(ErrorKind::InvalidKeyFormat.to_string(), "InvalidKeyFormat");
    }

    #[test]
    fn test_messages() {
        let err = Error::InvalidStrength(192);
        assert!(err.to_string().contains("192"));

        let err = Error::InvalidKeyCount(11);
        assert!(err.to_string().contains("between 1 and 10"));

        let err = Error::invalid_path("44'/0'", "must start with 'm/'");
        assert!(err.to_string().contains("44'/0'"));
    }

    #[test]
    fn test_requires_user_action() {
        assert!(Error::InvalidMnemonic("bad".into()).requires_user_action());
        assert!(!Error::KeyDerivationFailed("hmac".into()).requires_user_action());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::PairMismatch).unwrap();
        assert_eq!(json, "\"PairMismatch\"");
    }

    #[test]
    fn test_kind_display_matches_serialized_name() {
        for kind in [
            ErrorKind::InvalidMnemonic,
            ErrorKind::InvalidStrength,
            ErrorKind::InvalidPath,
            ErrorKind::InvalidKeyCount,
            ErrorKind::UnsupportedKeyType,
            ErrorKind::KeyDerivationFailed,
            ErrorKind::InvalidKeyFormat,
            ErrorKind::PairMismatch,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
