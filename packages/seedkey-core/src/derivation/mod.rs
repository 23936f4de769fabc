//! # Key Derivation Engine
//!
//! Turns a seed and a path into an Ed25519 key pair, one path or a batch at
//! a time.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         DERIVATION PIPELINE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Mnemonic + passphrase                                                 │
//! │        │  BIP39 stretch (once per batch)                               │
//! │        ▼                                                                │
//! │  Seed (64 bytes)                                                       │
//! │        │                                                                │
//! │        ├── m/44'/0'/0'/0/0 ──► KeyMaterial ──► KeyPair                 │
//! │        ├── m/44'/0'/0'/0/1 ──► KeyMaterial ──► KeyPair                 │
//! │        └── ...                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each key costs one 100000-round PBKDF2; a host serving concurrent
//! requests should run these calls on a blocking-friendly thread.

mod material;
mod path;

pub use material::{derive_key_material, KeyMaterial, EXPANDED_MATERIAL_SIZE, SEED_MATERIAL_SIZE};
pub use path::{DerivationPath, PathTemplate, Segment, HARDENED_OFFSET};

use crate::config::check_count;
use crate::crypto::KeyPair;
use crate::encoding::{EncodedKey, SshEncoder};
use crate::error::Result;
use crate::mnemonic::{MnemonicService, Seed};
use crate::verify::Fingerprint;

/// A key pair together with the path it was derived from
#[derive(Debug)]
pub struct DerivedKey {
    /// Path the key was derived at
    pub path: DerivationPath,
    /// The derived key pair
    pub key_pair: KeyPair,
}

impl DerivedKey {
    /// Render the key as host-facing text
    pub fn encode(&self) -> EncodedKey {
        SshEncoder::new().encode_key(&self.path, &self.key_pair)
    }

    /// Fingerprint of the public key
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.key_pair.public_bytes())
    }
}

/// Stateless derivation engine
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDerivationEngine;

impl KeyDerivationEngine {
    /// Create an engine
    pub fn new() -> Self {
        Self
    }

    /// Derive the key material for one path
    pub fn derive_key_material(&self, seed: &Seed, path: &DerivationPath) -> Result<KeyMaterial> {
        derive_key_material(seed, path)
    }

    /// Build a key pair from key material
    ///
    /// 32 bytes are used as an Ed25519 seed, 64 bytes as an expanded
    /// secret; any other length is `UnsupportedKeyType`.
    pub fn derive_key_pair(&self, material: &KeyMaterial) -> Result<KeyPair> {
        KeyPair::from_secret_bytes(material.as_bytes())
    }

    /// Derive the key pair at one path
    pub fn derive(&self, seed: &Seed, path: &DerivationPath) -> Result<DerivedKey> {
        let material = self.derive_key_material(seed, path)?;
        let key_pair = self.derive_key_pair(&material)?;

        let derived = DerivedKey {
            path: path.clone(),
            key_pair,
        };
        tracing::debug!(
            path = %derived.path,
            fingerprint = %derived.fingerprint(),
            "Derived key"
        );
        Ok(derived)
    }

    /// Derive key pairs for an ordered list of already-parsed paths
    pub fn derive_from_seed(&self, seed: &Seed, paths: &[DerivationPath]) -> Result<Vec<DerivedKey>> {
        paths.iter().map(|path| self.derive(seed, path)).collect()
    }

    /// Derive `count` keys along a path template
    ///
    /// `{i}` in the template takes the values `0..count`, in order. The
    /// mnemonic is validated, then the count and template, and only then is
    /// the seed stretched (once for the whole batch).
    pub fn derive_multiple(
        &self,
        mnemonic: &str,
        passphrase: &str,
        count: usize,
        path_template: &str,
    ) -> Result<Vec<DerivedKey>> {
        let service = MnemonicService::new();
        let mnemonic = service.parse(mnemonic)?;

        let paths = self.template_paths(path_template, count)?;
        let seed = service.to_seed(&mnemonic, passphrase);
        let keys = self.derive_from_seed(&seed, &paths)?;

        tracing::info!(count = keys.len(), template = path_template, "Derived key batch");
        Ok(keys)
    }

    /// The `count` paths a template expands to, `{i}` = `0..count`
    ///
    /// Checks the count bounds and the template; does no stretching.
    pub fn template_paths(&self, path_template: &str, count: usize) -> Result<Vec<DerivationPath>> {
        check_count(count)?;
        let template = PathTemplate::parse(path_template)?;
        (0..count as u32).map(|i| template.expand(i)).collect()
    }

    /// Derive keys for explicit paths, e.g. when restoring saved keys
    ///
    /// Every path is validated before any stretching happens.
    pub fn derive_paths<S: AsRef<str>>(
        &self,
        mnemonic: &str,
        passphrase: &str,
        paths: &[S],
    ) -> Result<Vec<DerivedKey>> {
        let service = MnemonicService::new();
        let mnemonic = service.parse(mnemonic)?;

        let paths = paths
            .iter()
            .map(|p| DerivationPath::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let seed = service.to_seed(&mnemonic, passphrase);
        let keys = self.derive_from_seed(&seed, &paths)?;

        tracing::info!(count = keys.len(), "Restored keys from explicit paths");
        Ok(keys)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PATH_TEMPLATE;
    use crate::crypto::SecretKind;
    use crate::error::Error;

    const TEST_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_fixed_vector() {
        let engine = KeyDerivationEngine::new();
        let keys = engine
            .derive_paths(TEST_PHRASE, "", &["m/44'/60'/0'/0/0"])
            .unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_pair.secret_kind(), SecretKind::Expanded);
        assert_eq!(
            hex::encode(keys[0].key_pair.public_bytes()),
            "775c14549b28dd1189ee2d7cb2637432692408089a64c935e3029340ae9490d3"
        );
        assert_eq!(
            keys[0].fingerprint().to_string(),
            "43:af:68:8f:89:dd:de:0d:e0:6c:f9:be:5e:08:91:20:de:42:aa:c3:55:ec:db:74:7a:fc:1d:dc:d0:87:4b:c1"
        );
    }

    #[test]
    fn test_derive_multiple_ordered() {
        let engine = KeyDerivationEngine::new();
        let keys = engine
            .derive_multiple(TEST_PHRASE, "", 2, DEFAULT_PATH_TEMPLATE)
            .unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].path.as_str(), "m/44'/0'/0'/0/0");
        assert_eq!(keys[1].path.as_str(), "m/44'/0'/0'/0/1");
        assert_eq!(
            hex::encode(keys[0].key_pair.public_bytes()),
            "2714e0f3a7849d7e4d7b81cea49f2f25f642ece00b31cc90ddeac24e8dee85cf"
        );
        assert_ne!(keys[0].key_pair.public_bytes(), keys[1].key_pair.public_bytes());
    }

    #[test]
    fn test_deterministic() {
        let engine = KeyDerivationEngine::new();
        let seed = Seed::from_bytes([11u8; 64]);
        let path = DerivationPath::parse("m/0'").unwrap();

        let a = engine.derive(&seed, &path).unwrap();
        let b = engine.derive(&seed, &path).unwrap();
        assert_eq!(a.key_pair.public_bytes(), b.key_pair.public_bytes());
        assert_eq!(*a.key_pair.secret_bytes(), *b.key_pair.secret_bytes());
    }

    #[test]
    fn test_passphrase_changes_keys() {
        let engine = KeyDerivationEngine::new();
        let plain = engine.derive_paths(TEST_PHRASE, "", &["m/0"]).unwrap();
        let salted = engine.derive_paths(TEST_PHRASE, "TREZOR", &["m/0"]).unwrap();
        assert_ne!(
            plain[0].key_pair.public_bytes(),
            salted[0].key_pair.public_bytes()
        );
    }

    #[test]
    fn test_invalid_mnemonic() {
        let engine = KeyDerivationEngine::new();
        let err = engine
            .derive_multiple(
                "this is not a mnemonic phrase with checksum",
                "",
                1,
                DEFAULT_PATH_TEMPLATE,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMnemonic(_)));
    }

    #[test]
    fn test_path_without_root_rejected() {
        let engine = KeyDerivationEngine::new();
        let err = engine
            .derive_paths(TEST_PHRASE, "", &["44'/0'/0'/0/0"])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));

        let err = engine
            .derive_multiple(TEST_PHRASE, "", 1, "44'/0'/0'/0/{i}")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_one_bad_path_fails_whole_batch() {
        let engine = KeyDerivationEngine::new();
        let result = engine.derive_paths(TEST_PHRASE, "", &["m/0", "m/x"]);
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_count_bounds() {
        let engine = KeyDerivationEngine::new();
        assert_eq!(
            engine
                .derive_multiple(TEST_PHRASE, "", 0, DEFAULT_PATH_TEMPLATE)
                .unwrap_err(),
            Error::InvalidKeyCount(0)
        );
        assert_eq!(
            engine
                .derive_multiple(TEST_PHRASE, "", 11, DEFAULT_PATH_TEMPLATE)
                .unwrap_err(),
            Error::InvalidKeyCount(11)
        );
    }

    #[test]
    fn test_template_paths() {
        let engine = KeyDerivationEngine::new();
        let paths = engine.template_paths("m/44'/60'/0'/0/{i}", 3).unwrap();
        let texts: Vec<&str> = paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(texts, ["m/44'/60'/0'/0/0", "m/44'/60'/0'/0/1", "m/44'/60'/0'/0/2"]);

        assert_eq!(
            engine.template_paths(DEFAULT_PATH_TEMPLATE, 0).unwrap_err(),
            Error::InvalidKeyCount(0)
        );
        assert!(matches!(
            engine.template_paths("m/44'/0'", 1),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_derive_key_pair_from_material_lengths() {
        let engine = KeyDerivationEngine::new();

        let seed_pair = engine
            .derive_key_pair(&KeyMaterial::from_bytes(&[1u8; SEED_MATERIAL_SIZE]))
            .unwrap();
        assert_eq!(seed_pair.secret_kind(), SecretKind::Seed);

        let expanded_pair = engine
            .derive_key_pair(&KeyMaterial::from_bytes(&[1u8; EXPANDED_MATERIAL_SIZE]))
            .unwrap();
        assert_eq!(expanded_pair.secret_kind(), SecretKind::Expanded);

        let err = engine
            .derive_key_pair(&KeyMaterial::from_bytes(&[1u8; 16]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedKeyType(_)));
    }
}
