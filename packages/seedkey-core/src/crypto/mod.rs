//! # Cryptography Module
//!
//! Ed25519 key pairs and signatures.
//!
//! | Algorithm | Purpose | Crate |
//! |-----------|---------|-------|
//! | Ed25519 | Key pairs, signatures | ed25519-dalek |
//! | SHA-512 | Seed expansion, signing | sha2 |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: secrets are zeroized when dropped
//! 2. **Constant-Time Operations**: dalek scalar multiplication
//! 3. **Secure Random**: `rand::rngs::OsRng` for generated keys

mod keys;

pub use ed25519_dalek::Signature;
pub use keys::{KeyPair, SecretKind};

/// Size of an Ed25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 seed secret in bytes
pub const SEED_SECRET_SIZE: usize = 32;

/// Size of an Ed25519 expanded secret in bytes
pub const EXPANDED_SECRET_SIZE: usize = 64;
