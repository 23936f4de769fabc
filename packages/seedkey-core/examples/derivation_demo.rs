//! # Key Derivation Demo
//!
//! This example walks through the whole seedkey pipeline:
//! 1. Generate a recovery phrase
//! 2. Derive several keys from it along a path template
//! 3. Encode them as key text
//! 4. Verify each pair and print its fingerprint
//! 5. Restore a key from its phrase and derivation path
//! 6. Sign and verify a challenge
//!
//! ## Run
//!
//! ```bash
//! cargo run --example derivation_demo
//! ```

use seedkey_core::{
    DerivationConfig, KeyDerivationEngine, KeyPairVerifier, MnemonicService, SshEncoder,
};

fn main() {
    println!("=================================================");
    println!("            SEEDKEY DERIVATION DEMO");
    println!("=================================================\n");

    let service = MnemonicService::new();
    let engine = KeyDerivationEngine::new();
    let encoder = SshEncoder::new();
    let verifier = KeyPairVerifier::new();

    // =========================================================================
    // STEP 1: Generate a recovery phrase
    // =========================================================================
    println!("1. Generating a 12-word recovery phrase...\n");

    let mnemonic = service.generate(128).expect("Failed to generate mnemonic");
    let phrase = mnemonic.phrase();

    for (i, word) in mnemonic.words().iter().enumerate() {
        print!("   {:>2}. {:<10}", i + 1, word);
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
    println!();
    println!("   Debug output stays redacted: {:?}", mnemonic);
    println!();

    // =========================================================================
    // STEP 2: Derive keys along the default template
    // =========================================================================
    let config = DerivationConfig::default().with_count(3);
    println!(
        "2. Deriving {} keys along {}...\n",
        config.count, config.path_template
    );

    let keys = engine
        .derive_multiple(&phrase, &config.passphrase, config.count, &config.path_template)
        .expect("Failed to derive keys");

    for key in &keys {
        println!("   {} -> {}", key.path, key.fingerprint());
    }
    println!();

    // =========================================================================
    // STEP 3: Encode the first key
    // =========================================================================
    println!("3. Encoding the first key...\n");

    let encoded = keys[0].encode();
    println!("   {}", encoded.public_key);
    println!("   {}", encoded.path_descriptor);
    println!(
        "   Private key: {} lines (not printed)",
        encoded.private_key.lines().count()
    );
    println!();

    // =========================================================================
    // STEP 4: Verify every pair, then a mismatched one
    // =========================================================================
    println!("4. Verifying key pairs...\n");

    for key in &keys {
        let encoded = key.encode();
        let result = verifier.verify(&encoded.public_key, &encoded.private_key);
        println!(
            "   {}: valid={} fingerprint={}",
            key.path,
            result.valid,
            result.fingerprint.unwrap_or_default()
        );
    }

    let first = keys[0].encode();
    let second = keys[1].encode();
    let mismatch = verifier.verify(&second.public_key, &first.private_key);
    println!(
        "   Mixed pair: valid={} error={:?}",
        mismatch.valid, mismatch.error_kind
    );
    println!();

    // =========================================================================
    // STEP 5: Restore from phrase + path descriptor
    // =========================================================================
    println!("5. Restoring the second key from its descriptor...\n");

    let path = encoder
        .parse_path_descriptor(&second.path_descriptor)
        .expect("Failed to parse descriptor");
    let restored = engine
        .derive_paths(&phrase, "", &[path.as_str()])
        .expect("Failed to restore key");

    let restored_public = encoder.encode_public(&restored[0].key_pair.public_bytes());
    println!("   Restored:  {}", restored_public);
    println!("   Original:  {}", second.public_key);
    println!("   Identical: {}", restored_public == second.public_key);
    println!();

    // =========================================================================
    // STEP 6: Prove possession with a signature
    // =========================================================================
    println!("6. Signing a challenge with the first key...\n");

    let challenge = b"prove you hold this key";
    let signature = keys[0].key_pair.sign(challenge);
    let ok = keys[0].key_pair.verify(challenge, &signature);

    println!("   Signature: {}...", &hex::encode(signature.to_bytes())[..32]);
    println!("   Verifies:  {}", ok);
    println!();

    println!("=================================================");
    println!("                 DEMO COMPLETE");
    println!("=================================================");
}
