//! Derivation configuration.
//!
//! Every option a host can pass to the pipeline, with its default:
//!
//! | Option          | Type     | Default               |
//! |-----------------|----------|-----------------------|
//! | `count`         | `usize`  | `1`                   |
//! | `passphrase`    | `String` | `""`                  |
//! | `word_count`    | `usize`  | `24`                  |
//! | `path_template` | `String` | `m/44'/0'/0'/0/{i}`   |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mnemonic::Strength;

/// Iterations of the BIP39 mnemonic → seed stretch
pub const SEED_ITERATIONS: u32 = 2048;

/// Iterations of the path-salted PBKDF2 that turns a seed into key material
pub const PATH_ITERATIONS: u32 = 100_000;

/// Upper bound on keys derived in one batch
pub const MAX_KEY_COUNT: usize = 10;

/// Placeholder replaced by the key index in a path template
pub const INDEX_PLACEHOLDER: &str = "{i}";

/// Path template used when the host does not supply one
pub const DEFAULT_PATH_TEMPLATE: &str = "m/44'/0'/0'/0/{i}";

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Number of keys to derive (1..=MAX_KEY_COUNT)
    pub count: usize,
    /// Optional BIP39 passphrase
    pub passphrase: String,
    /// Mnemonic length for newly generated phrases (12 or 24)
    pub word_count: usize,
    /// Path template; `{i}` is replaced by the key index
    pub path_template: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            count: 1,
            passphrase: String::new(),
            word_count: 24,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
        }
    }
}

impl DerivationConfig {
    /// Set the number of keys to derive
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the BIP39 passphrase
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Set the word count of generated mnemonics
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }

    /// Set the derivation path template
    pub fn with_path_template(mut self, template: impl Into<String>) -> Self {
        self.path_template = template.into();
        self
    }

    /// Mnemonic strength implied by `word_count`
    pub fn strength(&self) -> Result<Strength> {
        Strength::from_word_count(self.word_count)
    }

    /// Check every option without doing any derivation work
    pub fn validate(&self) -> Result<()> {
        check_count(self.count)?;
        self.strength()?;
        crate::derivation::PathTemplate::parse(&self.path_template)?;
        Ok(())
    }
}

pub(crate) fn check_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_KEY_COUNT {
        return Err(Error::InvalidKeyCount(count));
    }
    Ok(())
}
