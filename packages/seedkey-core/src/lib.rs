//! # Seedkey Core
//!
//! Deterministic Ed25519 key pairs from BIP39 mnemonics, with SSH-style text
//! encoding and key pair verification.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SEEDKEY CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐   ┌──────────────┐   ┌─────────────┐   ┌────────────┐ │
//! │  │  Mnemonic   │   │  Derivation  │   │  Encoding   │   │   Verify   │ │
//! │  │             │   │              │   │             │   │            │ │
//! │  │ - Generate  │──►│ - Paths      │──►│ - Public    │──►│ - Match    │ │
//! │  │ - Validate  │   │ - Material   │   │ - Private   │   │ - Finger-  │ │
//! │  │ - Seed      │   │ - Key pairs  │   │ - Path line │   │   print    │ │
//! │  └─────────────┘   └──────┬───────┘   └─────────────┘   └────────────┘ │
//! │                           │                                             │
//! │                    ┌──────┴───────┐                                     │
//! │                    │    Crypto    │                                     │
//! │                    │ - Ed25519    │                                     │
//! │                    │ - Signing    │                                     │
//! │                    └──────────────┘                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type for the entire library
//! - [`config`] - Derivation options and limits
//! - [`mnemonic`] - BIP39 phrases and seed stretching
//! - [`derivation`] - Paths, key material and the derivation engine
//! - [`crypto`] - Ed25519 key pairs and signatures
//! - [`encoding`] - Key text formats
//! - [`verify`] - Pair verification and fingerprints
//! - [`pipeline`] - End-to-end generate and restore helpers
//!
//! ## Example
//!
//! ```
//! use seedkey_core::{restore_keys, KeyPairVerifier};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let keys = restore_keys(phrase, "", &["m/44'/0'/0'/0/0"])?;
//!
//! let result = KeyPairVerifier::new().verify(&keys[0].public_key, &keys[0].private_key);
//! assert!(result.valid);
//! # Ok::<(), seedkey_core::Error>(())
//! ```
//!
//! The core does no I/O: writing keys to disk is the host's job.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod crypto;
pub mod derivation;
pub mod encoding;
pub mod error;
pub mod mnemonic;
pub mod pipeline;
pub mod verify;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::DerivationConfig;
pub use crypto::{KeyPair, Signature};
pub use derivation::{DerivationPath, DerivedKey, KeyDerivationEngine};
pub use encoding::{EncodedKey, SshEncoder};
pub use error::{Error, ErrorKind, Result};
pub use mnemonic::{Mnemonic, MnemonicService, Seed, Strength};
pub use pipeline::{derive_keys, generate_keys, restore_keys, GeneratedKeys};
pub use verify::{Fingerprint, KeyPairVerifier, VerificationResult};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Seedkey Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
