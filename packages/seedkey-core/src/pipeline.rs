//! End-to-end helpers: mnemonic in, host-facing key text out.

use crate::config::DerivationConfig;
use crate::derivation::{DerivedKey, KeyDerivationEngine};
use crate::encoding::EncodedKey;
use crate::error::Result;
use crate::mnemonic::{Mnemonic, MnemonicService};

/// A fresh mnemonic and the keys derived from it
#[derive(Debug)]
pub struct GeneratedKeys {
    /// The generated mnemonic; the host shows it to the user once
    pub mnemonic: Mnemonic,
    /// Encoded keys, in template index order
    pub keys: Vec<EncodedKey>,
}

/// Generate a mnemonic and derive `config.count` keys from it
///
/// The configuration is validated before any entropy is drawn.
pub fn generate_keys(config: &DerivationConfig) -> Result<GeneratedKeys> {
    config.validate()?;

    let service = MnemonicService::new();
    let mnemonic = service.generate_with(config.strength()?)?;

    let engine = KeyDerivationEngine::new();
    let paths = engine.template_paths(&config.path_template, config.count)?;
    let seed = service.to_seed(&mnemonic, &config.passphrase);
    let keys = engine.derive_from_seed(&seed, &paths)?;

    tracing::info!(
        words = mnemonic.word_count(),
        count = keys.len(),
        "Generated mnemonic and keys"
    );

    Ok(GeneratedKeys {
        mnemonic,
        keys: encode_all(&keys),
    })
}

/// Derive `config.count` keys from an existing mnemonic
///
/// `config.word_count` is ignored; the phrase decides its own length.
pub fn derive_keys(mnemonic: &str, config: &DerivationConfig) -> Result<Vec<EncodedKey>> {
    let keys = KeyDerivationEngine::new().derive_multiple(
        mnemonic,
        &config.passphrase,
        config.count,
        &config.path_template,
    )?;
    Ok(encode_all(&keys))
}

/// Re-derive keys at explicit paths
pub fn restore_keys<S: AsRef<str>>(
    mnemonic: &str,
    passphrase: &str,
    paths: &[S],
) -> Result<Vec<EncodedKey>> {
    let keys = KeyDerivationEngine::new().derive_paths(mnemonic, passphrase, paths)?;
    Ok(encode_all(&keys))
}

fn encode_all(keys: &[DerivedKey]) -> Vec<EncodedKey> {
    keys.iter().map(DerivedKey::encode).collect()
}
