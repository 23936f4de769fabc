//! # Mnemonic Service (BIP39)
//!
//! Generation, validation and seed stretching for BIP39 phrases.
//!
//! ## Generation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BIP39 MNEMONIC GENERATION                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Strength   Entropy    Checksum   Total      Words                     │
//! │  ───────────────────────────────────────────────────                    │
//! │  128 bits   16 bytes   4 bits     132 bits   12                        │
//! │  256 bits   32 bytes   8 bits     264 bits   24                        │
//! │                                                                         │
//! │  checksum = first (entropy_bits / 32) bits of SHA256(entropy)          │
//! │  each 11-bit group indexes the 2048-word English list                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Seed Derivation
//!
//! ```text
//! PBKDF2-HMAC-SHA512(
//!     password   = mnemonic sentence (NFKD, single spaces),
//!     salt       = "mnemonic" + passphrase,
//!     iterations = 2048,
//!     key_length = 64 bytes
//! ) → Seed
//! ```
//!
//! Unlike a wallet that keeps only half of the stretched seed, every byte of
//! the 64-byte seed feeds the per-path derivation.

use bip39::Language;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Size of a stretched BIP39 seed in bytes
pub const SEED_SIZE: usize = 64;

/// Entropy strength of a mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    /// 128 bits of entropy, 12 words
    Bits128,
    /// 256 bits of entropy, 24 words
    Bits256,
}

impl Strength {
    /// Map a bit count to a strength
    pub fn from_bits(bits: usize) -> Result<Self> {
        match bits {
            128 => Ok(Strength::Bits128),
            256 => Ok(Strength::Bits256),
            other => Err(Error::InvalidStrength(other)),
        }
    }

    /// Map a word count to a strength
    pub fn from_word_count(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Strength::Bits128),
            24 => Ok(Strength::Bits256),
            // 11 bits per word, one checksum bit per 32 bits of entropy
            other => Err(Error::InvalidStrength(other.saturating_mul(32) / 3)),
        }
    }

    /// Entropy size in bits
    pub fn bits(self) -> usize {
        match self {
            Strength::Bits128 => 128,
            Strength::Bits256 => 256,
        }
    }

    /// Number of words in a phrase of this strength
    pub fn word_count(self) -> usize {
        match self {
            Strength::Bits128 => 12,
            Strength::Bits256 => 24,
        }
    }

    fn entropy_bytes(self) -> usize {
        self.bits() / 8
    }
}

/// A validated BIP39 mnemonic
///
/// ## Security Warning
///
/// - The phrase recovers every key derived from it
/// - It should be shown to the user exactly once
/// - Never log it; `Debug` output is redacted
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    inner: bip39::Mnemonic,
}

impl Mnemonic {
    /// The words, in order
    pub fn words(&self) -> Vec<&'static str> {
        self.inner.words().collect()
    }

    /// Number of words (12 or 24)
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// Entropy strength of this phrase
    pub fn strength(&self) -> Strength {
        // Only 12 and 24 word phrases can be constructed
        if self.word_count() == 12 {
            Strength::Bits128
        } else {
            Strength::Bits256
        }
    }

    /// The phrase as a single space-separated string
    ///
    /// ## Security Warning
    ///
    /// Only use this for display to the user or for handing to the host.
    pub fn phrase(&self) -> String {
        self.inner.to_string()
    }
}

// Prevent accidental logging
impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.word_count())
    }
}

/// A 64-byte BIP39 seed, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw seed bytes
    ///
    /// ## Security Warning
    ///
    /// Never log or persist these bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seed([REDACTED])")
    }
}

/// Stateless BIP39 service
///
/// Holds no state, so a fresh value can be created per call and shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MnemonicService;

impl MnemonicService {
    /// Create a service
    pub fn new() -> Self {
        Self
    }

    /// Generate a new random mnemonic from a bit strength (128 or 256)
    pub fn generate(&self, strength_bits: usize) -> Result<Mnemonic> {
        let strength = Strength::from_bits(strength_bits)?;
        self.generate_with(strength)
    }

    /// Generate a new random mnemonic from a word count (12 or 24)
    pub fn generate_words(&self, word_count: usize) -> Result<Mnemonic> {
        let strength = Strength::from_word_count(word_count)?;
        self.generate_with(strength)
    }

    /// Generate a new random mnemonic of the given strength
    ///
    /// Entropy comes from the operating system CSPRNG.
    pub fn generate_with(&self, strength: Strength) -> Result<Mnemonic> {
        let mut entropy = [0u8; 32];
        let entropy = &mut entropy[..strength.entropy_bytes()];
        rand::rngs::OsRng.fill_bytes(entropy);

        let result = bip39::Mnemonic::from_entropy(entropy);
        entropy.zeroize();

        let inner = result.map_err(|e| {
            Error::KeyDerivationFailed(format!("Failed to generate mnemonic: {}", e))
        })?;

        tracing::debug!(words = inner.word_count(), "Generated mnemonic");
        Ok(Mnemonic { inner })
    }

    /// Parse and validate a phrase
    ///
    /// ## Validation
    ///
    /// - Case and surrounding/duplicate whitespace are ignored
    /// - Must be exactly 12 or 24 words
    /// - All words must be in the BIP39 English wordlist
    /// - Checksum must be valid
    pub fn parse(&self, phrase: &str) -> Result<Mnemonic> {
        let normalized = normalize_phrase(phrase);
        let word_count = normalized.split(' ').filter(|w| !w.is_empty()).count();

        if word_count != 12 && word_count != 24 {
            return Err(Error::InvalidMnemonic(format!(
                "Expected 12 or 24 words, got {}",
                word_count
            )));
        }

        let inner = bip39::Mnemonic::parse_in(Language::English, normalized)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

        Ok(Mnemonic { inner })
    }

    /// Check whether a phrase is a valid 12 or 24 word mnemonic
    pub fn validate(&self, phrase: &str) -> bool {
        self.parse(phrase).is_ok()
    }

    /// Stretch a mnemonic and passphrase into a 64-byte seed
    ///
    /// Same mnemonic + different passphrase = unrelated seed.
    pub fn to_seed(&self, mnemonic: &Mnemonic, passphrase: &str) -> Seed {
        Seed(mnemonic.inner.to_seed(passphrase))
    }

    /// Parse a phrase and stretch it in one step
    pub fn phrase_to_seed(&self, phrase: &str, passphrase: &str) -> Result<Seed> {
        let mnemonic = self.parse(phrase)?;
        Ok(self.to_seed(&mnemonic, passphrase))
    }

    /// Check if a single word is in the BIP39 wordlist
    pub fn is_valid_word(&self, word: &str) -> bool {
        let word_lower = word.trim().to_lowercase();
        Language::English
            .word_list()
            .iter()
            .any(|w| *w == word_lower)
    }

    /// Get word suggestions for autocomplete
    ///
    /// Returns at most 10 words from the wordlist starting with `prefix`.
    pub fn suggest_words(&self, prefix: &str) -> Vec<&'static str> {
        let prefix_lower = prefix.trim().to_lowercase();
        if prefix_lower.is_empty() {
            return vec![];
        }

        Language::English
            .word_list()
            .iter()
            .filter(|w| w.starts_with(&prefix_lower))
            .take(10)
            .copied()
            .collect()
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SEED_ITERATIONS;
    use hmac::Hmac;
    use sha2::Sha512;

    const TEST_PHRASE_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const TEST_PHRASE_24: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_generate_12_and_24_words() {
        let service = MnemonicService::new();

        let short = service.generate(128).unwrap();
        assert_eq!(short.word_count(), 12);
        assert_eq!(short.strength(), Strength::Bits128);

        let long = service.generate(256).unwrap();
        assert_eq!(long.words().len(), 24);
        assert_eq!(long.strength(), Strength::Bits256);
    }

    #[test]
    fn test_generate_invalid_strength() {
        let service = MnemonicService::new();
        assert_eq!(service.generate(192).unwrap_err(), Error::InvalidStrength(192));
        assert_eq!(service.generate(0).unwrap_err(), Error::InvalidStrength(0));
        assert!(matches!(
            service.generate_words(18),
            Err(Error::InvalidStrength(192))
        ));
    }

    #[test]
    fn test_huge_word_count_is_an_error() {
        assert_eq!(
            Strength::from_word_count(usize::MAX),
            Err(Error::InvalidStrength(usize::MAX / 3))
        );
        assert!(matches!(
            MnemonicService::new().generate_words(usize::MAX),
            Err(Error::InvalidStrength(_))
        ));
    }

    #[test]
    fn test_generated_phrase_validates() {
        let service = MnemonicService::new();
        let mnemonic = service.generate_words(24).unwrap();
        assert!(service.validate(&mnemonic.phrase()));
    }

    #[test]
    fn test_generated_phrases_differ() {
        let service = MnemonicService::new();
        let a = service.generate(256).unwrap();
        let b = service.generate(256).unwrap();
        assert_ne!(a.phrase(), b.phrase());
    }

    #[test]
    fn test_validate_known_phrases() {
        let service = MnemonicService::new();
        assert!(service.validate(TEST_PHRASE_12));
        assert!(service.validate(TEST_PHRASE_24));
    }

    #[test]
    fn test_validate_normalizes_input() {
        let service = MnemonicService::new();
        let messy = format!("  {}  ", TEST_PHRASE_12.to_uppercase().replace(' ', "   "));
        let mnemonic = service.parse(&messy).unwrap();
        assert_eq!(mnemonic.phrase(), TEST_PHRASE_12);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let service = MnemonicService::new();
        assert!(!service.validate("this is not a mnemonic phrase with checksum"));
        assert!(!service.validate(""));
        assert!(!service.validate("abandon abandon abandon"));
    }

    #[test]
    fn test_validate_rejects_bad_checksum() {
        let service = MnemonicService::new();
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(service.parse(bad), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_word() {
        let service = MnemonicService::new();
        let bad = TEST_PHRASE_12.replacen("abandon", "notaword", 1);
        assert!(!service.validate(&bad));
    }

    #[test]
    fn test_validate_rejects_other_bip39_lengths() {
        // Valid 15-word BIP39 phrase, but only 12 and 24 are accepted
        let fifteen = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon address";
        assert!(!MnemonicService::new().validate(fifteen));
    }

    #[test]
    fn test_seed_known_vector() {
        let service = MnemonicService::new();
        let seed = service.phrase_to_seed(TEST_PHRASE_12, "").unwrap();
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_seed_matches_pbkdf2() {
        let service = MnemonicService::new();
        let seed = service.phrase_to_seed(TEST_PHRASE_12, "TREZOR").unwrap();

        let mut expected = [0u8; SEED_SIZE];
        pbkdf2::pbkdf2::<Hmac<Sha512>>(
            TEST_PHRASE_12.as_bytes(),
            b"mnemonicTREZOR",
            SEED_ITERATIONS,
            &mut expected,
        )
        .unwrap();

        assert_eq!(seed.as_bytes(), &expected);
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let service = MnemonicService::new();
        let mnemonic = service.parse(TEST_PHRASE_12).unwrap();

        let plain = service.to_seed(&mnemonic, "");
        let with_pass = service.to_seed(&mnemonic, "secret");

        assert_ne!(plain.as_bytes(), with_pass.as_bytes());
    }

    #[test]
    fn test_is_valid_word() {
        let service = MnemonicService::new();
        assert!(service.is_valid_word("abandon"));
        assert!(service.is_valid_word("ZOO"));
        assert!(!service.is_valid_word("notaword"));
    }

    #[test]
    fn test_suggest_words() {
        let service = MnemonicService::new();
        let suggestions = service.suggest_words("ab");
        assert!(suggestions.contains(&"abandon"));
        assert!(suggestions.contains(&"ability"));
        assert!(suggestions.len() <= 10);

        assert!(service.suggest_words("").is_empty());
        assert!(service.suggest_words("xyz").is_empty());
    }

    #[test]
    fn test_debug_redacts() {
        let service = MnemonicService::new();
        let mnemonic = service.parse(TEST_PHRASE_12).unwrap();
        let seed = service.to_seed(&mnemonic, "");

        let debug = format!("{:?} {:?}", mnemonic, seed);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("abandon"));
    }
}
