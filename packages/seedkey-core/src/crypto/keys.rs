//! # Ed25519 Key Pairs
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TWO WAYS TO BUILD A KEY PAIR                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  From a 32-byte seed (RFC 8032 key generation)                         │
//! │  ─────────────────────────────────────────────                          │
//! │    h = SHA-512(seed)                                                   │
//! │    scalar = clamp(h[..32]),  prefix = h[32..]                          │
//! │    public = scalar · B                                                 │
//! │                                                                         │
//! │  From a 64-byte expanded secret (derived key material)                 │
//! │  ─────────────────────────────────────────────────────                  │
//! │    scalar = clamp(secret[..32]),  prefix = secret[32..]                │
//! │    public = scalar · B                                                 │
//! │                                                                         │
//! │  Either way the public key is recomputed from the secret, never        │
//! │  taken on trust.                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::crypto::{EXPANDED_SECRET_SIZE, PUBLIC_KEY_SIZE, SEED_SECRET_SIZE};
use crate::error::{Error, Result};

/// How the secret half of a [`KeyPair`] is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// 32-byte Ed25519 seed
    Seed,
    /// 64-byte expanded secret (scalar ‖ hash prefix)
    Expanded,
}

enum Secret {
    Seed(SigningKey),
    Expanded {
        bytes: Zeroizing<[u8; EXPANDED_SECRET_SIZE]>,
        key: ExpandedSecretKey,
    },
}

/// An Ed25519 key pair
///
/// ## Security
///
/// - The secret is zeroized when this struct is dropped
/// - `Debug` shows only the public key
pub struct KeyPair {
    secret: Secret,
    public: VerifyingKey,
}

impl KeyPair {
    /// Generate a new random key pair from the OS CSPRNG
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build a key pair from a 32-byte seed
    pub fn from_seed(seed: &[u8; SEED_SECRET_SIZE]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Build a key pair directly from a 64-byte expanded secret
    ///
    /// The first half is clamped and used as the scalar, the second half is
    /// the nonce prefix for signing.
    pub fn from_expanded_secret(secret: &[u8; EXPANDED_SECRET_SIZE]) -> Self {
        let mut clamped = Zeroizing::new(*secret);
        clamp(&mut clamped[..SEED_SECRET_SIZE]);

        let key = ExpandedSecretKey::from_bytes(&clamped);
        let public = VerifyingKey::from(&key);

        Self {
            secret: Secret::Expanded {
                bytes: Zeroizing::new(*secret),
                key,
            },
            public,
        }
    }

    /// Build a key pair from secret bytes of either supported length
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        if let Ok(seed) = <&[u8; SEED_SECRET_SIZE]>::try_from(secret) {
            return Ok(Self::from_seed(seed));
        }
        if let Ok(expanded) = <&[u8; EXPANDED_SECRET_SIZE]>::try_from(secret) {
            return Ok(Self::from_expanded_secret(expanded));
        }
        Err(Error::UnsupportedKeyType(format!(
            "Ed25519 secret must be {} or {} bytes, got {}",
            SEED_SECRET_SIZE,
            EXPANDED_SECRET_SIZE,
            secret.len()
        )))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let public = key.verifying_key();
        Self {
            secret: Secret::Seed(key),
            public,
        }
    }

    /// How the secret is stored
    pub fn secret_kind(&self) -> SecretKind {
        match self.secret {
            Secret::Seed(_) => SecretKind::Seed,
            Secret::Expanded { .. } => SecretKind::Expanded,
        }
    }

    /// Get the secret key bytes (32 or 64, see [`Self::secret_kind`])
    ///
    /// ## Security Warning
    ///
    /// Only use this for encoding. Never log or transmit these bytes.
    pub fn secret_bytes(&self) -> Zeroizing<Vec<u8>> {
        match &self.secret {
            Secret::Seed(key) => Zeroizing::new(key.to_bytes().to_vec()),
            Secret::Expanded { bytes, .. } => Zeroizing::new(bytes.to_vec()),
        }
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> VerifyingKey {
        self.public
    }

    /// Sign a message
    ///
    /// Ed25519 signatures are deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        match &self.secret {
            Secret::Seed(key) => key.sign(message),
            Secret::Expanded { key, .. } => raw_sign::<Sha512>(key, message, &self.public),
        }
    }

    /// Check a signature against this key pair's public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public.verify(message, signature).is_ok()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public_bytes()))
            .field("secret", &format_args!("[REDACTED {:?}]", self.secret_kind()))
            .finish()
    }
}

/// RFC 8032 scalar clamping
fn clamp(scalar: &mut [u8]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}

// ============================================================================
// TESTS
// ============================================================================
