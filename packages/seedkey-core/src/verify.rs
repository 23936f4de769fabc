//! # Key Pair Verification
//!
//! Checks that a public key line and a private key block belong together,
//! and fingerprints the public key.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          VERIFICATION FLOW                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  public text ──► decode ──► public (32)                                │
//! │                                   │                                     │
//! │  private text ──► decode ──► secret ‖ embedded public (32)             │
//! │                                │          │                             │
//! │                                │          └──► == public ? ──► PairMismatch
//! │                                ▼                                        │
//! │                     rebuild public from secret                         │
//! │                                │                                        │
//! │                                └──► == public ? ──► PairMismatch       │
//! │                                                                         │
//! │  all equal ──► valid, fingerprint = SHA-256(public)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Verification never panics and never returns `Err`; failures come back as
//! data in [`VerificationResult`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::crypto::{KeyPair, PUBLIC_KEY_SIZE};
use crate::encoding::SshEncoder;
use crate::error::{Error, ErrorKind, Result};

/// SHA-256 fingerprint of a public key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint raw public key bytes
    pub fn of(public_key: &[u8; PUBLIC_KEY_SIZE]) -> Self {
        let digest = Sha256::digest(public_key);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// The raw digest
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Lowercase hex pairs joined by `:`
impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

/// Outcome of [`KeyPairVerifier::verify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the pair corresponds
    pub valid: bool,
    /// Colon-hex fingerprint, present only when `valid`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fingerprint: Option<String>,
    /// Why verification failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable failure detail
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

impl VerificationResult {
    fn success(fingerprint: Fingerprint) -> Self {
        Self {
            valid: true,
            fingerprint: Some(fingerprint.to_string()),
            error_kind: None,
            reason: None,
        }
    }

    fn failure(error: &Error) -> Self {
        Self {
            valid: false,
            fingerprint: None,
            error_kind: Some(error.kind()),
            reason: Some(error.to_string()),
        }
    }
}

/// Stateless key pair verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPairVerifier {
    encoder: SshEncoder,
}

impl KeyPairVerifier {
    /// Create a verifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify that `public_text` and `private_text` form one key pair
    pub fn verify(&self, public_text: &str, private_text: &str) -> VerificationResult {
        match self.check(public_text, private_text) {
            Ok(fingerprint) => {
                tracing::debug!(fingerprint = %fingerprint, "Key pair verified");
                VerificationResult::success(fingerprint)
            }
            Err(e) => {
                tracing::debug!(kind = %e.kind(), "Key pair rejected");
                VerificationResult::failure(&e)
            }
        }
    }

    /// Same checks as [`Self::verify`], as a `Result`
    pub fn check(&self, public_text: &str, private_text: &str) -> Result<Fingerprint> {
        let public = self.encoder.decode_public(public_text)?;
        let payload = self.encoder.decode_private(private_text)?;

        let (secret, embedded) = payload.split_at(payload.len() - PUBLIC_KEY_SIZE);
        if embedded != public.as_slice() {
            return Err(Error::PairMismatch);
        }

        let rebuilt = KeyPair::from_secret_bytes(secret).map_err(|_| {
            Error::InvalidKeyFormat(format!(
                "private key secret of {} bytes is not an Ed25519 secret",
                secret.len()
            ))
        })?;
        if rebuilt.public_bytes() != public {
            return Err(Error::PairMismatch);
        }

        Ok(Fingerprint::of(&public))
    }

    /// Fingerprint raw public key bytes
    pub fn fingerprint(&self, public_key: &[u8; PUBLIC_KEY_SIZE]) -> Fingerprint {
        Fingerprint::of(public_key)
    }
}

// ============================================================================
// TESTS
// ============================================================================
