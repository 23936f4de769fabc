//! # Key Material Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SEED + PATH → KEY MATERIAL                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  k1 = PBKDF2-HMAC-SHA512(                                              │
//! │         password   = seed (64 bytes),                                  │
//! │         salt       = UTF-8 bytes of the path text,                     │
//! │         iterations = 100000,                                           │
//! │         length     = 32 bytes)                                         │
//! │                                                                         │
//! │  k2 = HMAC-SHA512(key = k1, message = path text)[..32]                 │
//! │                                                                         │
//! │  material = k1 ‖ k2   (64-byte Ed25519 expanded secret)                │
//! │             │    └─ hash prefix used when signing                      │
//! │             └────── scalar, clamped before use                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is the only derivation the system performs. Keys are independent
//! per path string; there is no parent/child chain code.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::config::PATH_ITERATIONS;
use crate::derivation::DerivationPath;
use crate::error::{Error, Result};
use crate::mnemonic::Seed;

type HmacSha512 = Hmac<Sha512>;

/// Length of material interpreted as an Ed25519 seed
pub const SEED_MATERIAL_SIZE: usize = 32;

/// Length of material interpreted as an Ed25519 expanded secret
pub const EXPANDED_MATERIAL_SIZE: usize = 64;

/// Intermediate bytes a key pair is built from, zeroized on drop
#[derive(Clone)]
pub struct KeyMaterial(Zeroizing<Vec<u8>>);

impl KeyMaterial {
    /// Wrap raw material; its length decides how a key pair is built
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }

    /// Raw bytes
    ///
    /// ## Security Warning
    ///
    /// Never log or persist these bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the material is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyMaterial([REDACTED; {} bytes])", self.len())
    }
}

/// Derive 64 bytes of key material for `path` from a BIP39 seed
pub fn derive_key_material(seed: &Seed, path: &DerivationPath) -> Result<KeyMaterial> {
    let salt = path.as_str().as_bytes();

    let mut k1 = Zeroizing::new([0u8; SEED_MATERIAL_SIZE]);
    pbkdf2::pbkdf2::<HmacSha512>(seed.as_bytes(), salt, PATH_ITERATIONS, &mut k1[..])
        .map_err(|e| Error::KeyDerivationFailed(format!("PBKDF2 failed: {}", e)))?;

    let mut mac = HmacSha512::new_from_slice(&k1[..])
        .map_err(|e| Error::KeyDerivationFailed(format!("HMAC init failed: {}", e)))?;
    mac.update(salt);
    let mut tag = mac.finalize().into_bytes();

    let mut material = Zeroizing::new(vec![0u8; EXPANDED_MATERIAL_SIZE]);
    material[..SEED_MATERIAL_SIZE].copy_from_slice(&k1[..]);
    material[SEED_MATERIAL_SIZE..].copy_from_slice(&tag[..SEED_MATERIAL_SIZE]);

    tag.as_mut_slice().zeroize();

    Ok(KeyMaterial(material))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::MnemonicService;

    const TEST_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> Seed {
        MnemonicService::new().phrase_to_seed(TEST_PHRASE, "").unwrap()
    }

    #[test]
    fn test_known_material() {
        let path = DerivationPath::parse("m/44'/60'/0'/0/0").unwrap();
        let material = derive_key_material(&test_seed(), &path).unwrap();

        assert_eq!(material.len(), EXPANDED_MATERIAL_SIZE);
        assert_eq!(
            hex::encode(material.as_bytes()),
            "288c8806e557f554bf7bf583e719654fd3971d985b0fda699b85d6a290b1297df8d8869c19c3d05836c9d6678c7fc872564d6f8002b50a246c798b5efd2255f6"
        );
    }

    #[test]
    fn test_different_paths_different_material() {
        let seed = Seed::from_bytes([7u8; 64]);
        let a = derive_key_material(&seed, &"m/0".parse().unwrap()).unwrap();
        let b = derive_key_material(&seed, &"m/1".parse().unwrap()).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_path_spelling_matters() {
        // Same segments, different text: the text is the salt
        let seed = Seed::from_bytes([7u8; 64]);
        let a = derive_key_material(&seed, &"m/1'".parse().unwrap()).unwrap();
        let b = derive_key_material(&seed, &"m/1h".parse().unwrap()).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_redacts() {
        let material = KeyMaterial::from_bytes(&[0xAB; 32]);
        let debug = format!("{:?}", material);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ab"));
    }
}
