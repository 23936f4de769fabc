//! Seedkey CLI
//!
//! Host for `seedkey-core`: generates or restores Ed25519 keys from a BIP39
//! mnemonic, writes them to disk, and verifies key pairs.
//!
//! **Secrets**: the mnemonic is printed once to stdout by `generate` and is
//! never logged. Logs go to stderr and carry paths and fingerprints only.

mod store;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use seedkey_core::config::{DEFAULT_PATH_TEMPLATE, MAX_KEY_COUNT};
use seedkey_core::{DerivationConfig, KeyPairVerifier, MnemonicService};

use store::KeyStore;

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "seedkey",
    version,
    about = "Deterministic SSH-style Ed25519 keys from a BIP39 mnemonic"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh mnemonic
    Mnemonic {
        /// Number of words (12 or 24)
        #[arg(short, long, default_value_t = 24)]
        words: usize,
    },

    /// Check whether a phrase is a valid 12 or 24 word mnemonic
    Validate {
        /// The phrase; quoting is optional
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
    },

    /// Derive keys along a path template and write them
    Generate {
        /// Number of words for a newly generated mnemonic (12 or 24)
        #[arg(short, long, default_value_t = 24)]
        words: usize,

        /// Number of keys to derive
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// BIP39 passphrase
        #[arg(long, default_value = "", env = "SEEDKEY_PASSPHRASE", hide_env_values = true)]
        passphrase: String,

        /// Path template; `{i}` is replaced by the key index
        #[arg(long, default_value = DEFAULT_PATH_TEMPLATE)]
        template: String,

        /// Derive from this mnemonic instead of generating one
        #[arg(long, env = "SEEDKEY_MNEMONIC", hide_env_values = true)]
        mnemonic: Option<String>,

        /// Output directory
        #[arg(short, long, env = "SEEDKEY_OUTPUT_DIR")]
        out: PathBuf,

        /// Overwrite existing key files
        #[arg(long)]
        force: bool,
    },

    /// Re-derive keys at explicit paths and write them
    Restore {
        /// The mnemonic the keys were derived from
        #[arg(long, env = "SEEDKEY_MNEMONIC", hide_env_values = true)]
        mnemonic: String,

        /// BIP39 passphrase
        #[arg(long, default_value = "", env = "SEEDKEY_PASSPHRASE", hide_env_values = true)]
        passphrase: String,

        /// Derivation path, e.g. m/44'/0'/0'/0/0 (repeatable)
        #[arg(long = "path", required_unless_present = "from_dir")]
        paths: Vec<String>,

        /// Read paths from the derivation.txt files of an existing key directory
        #[arg(long, conflicts_with = "paths")]
        from_dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "SEEDKEY_OUTPUT_DIR")]
        out: PathBuf,

        /// Overwrite existing key files
        #[arg(long)]
        force: bool,
    },

    /// Check that a public and private key file belong together
    Verify {
        /// Public key file (ssh-ed25519 ...)
        #[arg(long)]
        public: PathBuf,

        /// Private key file
        #[arg(long)]
        private: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seedkey=info,seedkey_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(if run(Cli::parse())? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns whether the command succeeded; `Err` is reserved for failures
/// that should print a report
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Mnemonic { words } => {
            let mnemonic = MnemonicService::new().generate_words(words)?;
            println!("{}", mnemonic.phrase());
            Ok(true)
        }

        Command::Validate { phrase } => {
            let phrase = phrase.join(" ");
            match MnemonicService::new().parse(&phrase) {
                Ok(mnemonic) => {
                    println!("valid ({} words)", mnemonic.word_count());
                    Ok(true)
                }
                Err(e) => {
                    println!("invalid: {}", e);
                    Ok(false)
                }
            }
        }

        Command::Generate {
            words,
            count,
            passphrase,
            template,
            mnemonic,
            out,
            force,
        } => {
            let store = KeyStore::new(out)?;
            let config = DerivationConfig::default()
                .with_count(count)
                .with_passphrase(passphrase)
                .with_word_count(words)
                .with_path_template(template);

            let (phrase, keys) = match mnemonic {
                Some(phrase) => {
                    let keys = seedkey_core::derive_keys(&phrase, &config)?;
                    (None, keys)
                }
                None => {
                    let generated = seedkey_core::generate_keys(&config)?;
                    (Some(generated.mnemonic.phrase()), generated.keys)
                }
            };

            let dirs = store.write_all(&keys, force)?;
            for (dir, key) in dirs.iter().zip(&keys) {
                eprintln!("{}  {}", dir.display(), key.path_descriptor);
            }

            if let Some(phrase) = phrase {
                println!("{}", phrase);
                eprintln!("Write down this mnemonic. It is shown only once and recovers every key.");
            }
            Ok(true)
        }

        Command::Restore {
            mnemonic,
            passphrase,
            paths,
            from_dir,
            out,
            force,
        } => {
            let store = KeyStore::new(out)?;
            let paths: Vec<String> = match from_dir {
                Some(dir) => KeyStore::new(dir)?
                    .read_paths()?
                    .into_iter()
                    .map(String::from)
                    .collect(),
                None => paths,
            };
            if paths.len() > MAX_KEY_COUNT {
                tracing::warn!(
                    count = paths.len(),
                    "Restoring more keys than a single generate run allows"
                );
            }

            let keys = seedkey_core::restore_keys(&mnemonic, &passphrase, &paths)?;
            let dirs = store.write_all(&keys, force)?;
            for (dir, key) in dirs.iter().zip(&keys) {
                eprintln!("{}  {}", dir.display(), key.path_descriptor);
            }
            Ok(true)
        }

        Command::Verify {
            public,
            private,
            json,
        } => {
            let public_text = fs::read_to_string(&public)
                .wrap_err_with(|| format!("Failed to read {}", public.display()))?;
            let private_text = fs::read_to_string(&private)
                .wrap_err_with(|| format!("Failed to read {}", private.display()))?;

            let result = KeyPairVerifier::new().verify(&public_text, &private_text);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if let Some(fingerprint) = &result.fingerprint {
                println!("valid  SHA256 {}", fingerprint);
            } else {
                println!(
                    "invalid  {}",
                    result.reason.as_deref().unwrap_or("unknown error")
                );
            }

            Ok(result.valid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const TEST_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn run_args(args: &[&str]) -> Result<bool> {
        run(Cli::try_parse_from(args)?)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_restore_requires_a_path_source() {
        let result = Cli::try_parse_from([
            "seedkey", "restore", "--mnemonic", TEST_PHRASE, "--out", "keys",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_accepts_unquoted_words() {
        let mut args = vec!["seedkey", "validate"];
        args.extend(TEST_PHRASE.split(' '));
        assert!(run_args(&args).unwrap());

        assert!(!run_args(&["seedkey", "validate", "not", "a", "phrase"]).unwrap());
    }

    #[test]
    fn test_generate_then_verify() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("keys");
        let out_str = out.to_str().unwrap();

        run_args(&[
            "seedkey", "generate", "--mnemonic", TEST_PHRASE, "--count", "2", "--out", out_str,
        ])
        .unwrap();

        let key = out.join("key-1");
        let public = fs::read_to_string(key.join(store::PUBLIC_KEY_FILE)).unwrap();
        assert_eq!(
            public.trim(),
            "ssh-ed25519 JxTg86eEnX5Ne4HOpJ8vJfZC7OALMcyQ3erCTo3uhc8="
        );

        let valid = run_args(&[
            "seedkey",
            "verify",
            "--public",
            key.join(store::PUBLIC_KEY_FILE).to_str().unwrap(),
            "--private",
            key.join(store::PRIVATE_KEY_FILE).to_str().unwrap(),
        ])
        .unwrap();
        assert!(valid);

        let mixed = run_args(&[
            "seedkey",
            "verify",
            "--public",
            out.join("key-2").join(store::PUBLIC_KEY_FILE).to_str().unwrap(),
            "--private",
            key.join(store::PRIVATE_KEY_FILE).to_str().unwrap(),
        ])
        .unwrap();
        assert!(!mixed);

        // Second run into the same directory is refused
        assert!(run_args(&[
            "seedkey", "generate", "--mnemonic", TEST_PHRASE, "--out", out_str,
        ])
        .is_err());
    }

    #[test]
    fn test_restore_from_dir_reproduces_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let original = tmp.path().join("original");
        let restored = tmp.path().join("restored");

        run_args(&[
            "seedkey",
            "generate",
            "--mnemonic",
            TEST_PHRASE,
            "--passphrase",
            "pw",
            "--count",
            "2",
            "--out",
            original.to_str().unwrap(),
        ])
        .unwrap();

        run_args(&[
            "seedkey",
            "restore",
            "--mnemonic",
            TEST_PHRASE,
            "--passphrase",
            "pw",
            "--from-dir",
            original.to_str().unwrap(),
            "--out",
            restored.to_str().unwrap(),
        ])
        .unwrap();

        for n in ["key-1", "key-2"] {
            for file in [store::PRIVATE_KEY_FILE, store::PUBLIC_KEY_FILE, store::DESCRIPTOR_FILE] {
                assert_eq!(
                    fs::read_to_string(original.join(n).join(file)).unwrap(),
                    fs::read_to_string(restored.join(n).join(file)).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_restore_rejects_bad_path() {
        let tmp = tempfile::tempdir().unwrap();
        let result = run_args(&[
            "seedkey",
            "restore",
            "--mnemonic",
            TEST_PHRASE,
            "--path",
            "44'/0'/0'/0/0",
            "--out",
            tmp.path().to_str().unwrap(),
        ]);
        assert!(result.is_err());
    }
}
