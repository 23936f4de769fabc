//! # Key Text Encoding
//!
//! ## Formats
//!
//! ```text
//! Public key (one line):
//!
//!   ssh-ed25519 <base64(public, 32 bytes)>
//!
//! Private key (64 base64 characters per line):
//!
//!   -----BEGIN SEEDKEY ED25519 PRIVATE KEY-----
//!   <base64(secret ‖ public)>
//!   -----END SEEDKEY ED25519 PRIVATE KEY-----
//!
//!   secret = 32-byte seed or 64-byte expanded secret
//!   public = last 32 bytes of the payload
//! ```
//!
//! The private framing is this crate's own format. It has none of the
//! OpenSSH container fields (magic, cipher, KDF, padding, checkints), so an
//! OpenSSH client will not load it. The public line carries the raw key
//! bytes rather than an SSH wire blob for the same reason.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::{KeyPair, PUBLIC_KEY_SIZE};
use crate::derivation::DerivationPath;
use crate::error::{Error, Result};

/// Key type token of public key lines
pub const KEY_TYPE: &str = "ssh-ed25519";

/// First line of a private key
pub const PRIVATE_KEY_BEGIN: &str = "-----BEGIN SEEDKEY ED25519 PRIVATE KEY-----";

/// Last line of a private key
pub const PRIVATE_KEY_END: &str = "-----END SEEDKEY ED25519 PRIVATE KEY-----";

/// Prefix of the derivation path descriptor line
pub const PATH_DESCRIPTOR_PREFIX: &str = "Derivation Path: ";

/// Width of base64 lines in a private key
pub const LINE_WIDTH: usize = 64;

/// Smallest decoded private payload: 32-byte secret plus 32-byte public key
pub const MIN_PRIVATE_PAYLOAD: usize = 64;

/// The three strings handed to the host for one derived key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedKey {
    /// Framed private key text
    pub private_key: String,
    /// `ssh-ed25519 ...` public key line
    pub public_key: String,
    /// `Derivation Path: ...` descriptor line
    pub path_descriptor: String,
}

/// Stateless encoder/decoder for key text
#[derive(Debug, Clone, Copy, Default)]
pub struct SshEncoder;

impl SshEncoder {
    /// Create an encoder
    pub fn new() -> Self {
        Self
    }

    /// Encode a public key as `ssh-ed25519 <base64>`
    pub fn encode_public(&self, public: &[u8; PUBLIC_KEY_SIZE]) -> String {
        format!("{} {}", KEY_TYPE, STANDARD.encode(public))
    }

    /// Encode secret bytes (32 or 64) as framed private key text
    ///
    /// The public key is recomputed from the secret and appended.
    pub fn encode_private(&self, secret: &[u8]) -> Result<String> {
        let key_pair = KeyPair::from_secret_bytes(secret)?;
        Ok(self.encode_key_pair_private(&key_pair))
    }

    /// Encode the private half of a key pair
    pub fn encode_key_pair_private(&self, key_pair: &KeyPair) -> String {
        let secret = key_pair.secret_bytes();
        let mut payload = Zeroizing::new(Vec::with_capacity(secret.len() + PUBLIC_KEY_SIZE));
        payload.extend_from_slice(&secret);
        payload.extend_from_slice(&key_pair.public_bytes());
        self.encode_private_payload(&payload)
    }

    /// Frame an already-assembled `secret ‖ public` payload
    pub fn encode_private_payload(&self, payload: &[u8]) -> String {
        let encoded = Zeroizing::new(STANDARD.encode(payload));

        let mut out = String::with_capacity(
            PRIVATE_KEY_BEGIN.len() + PRIVATE_KEY_END.len() + encoded.len() * 2,
        );
        out.push_str(PRIVATE_KEY_BEGIN);
        out.push('\n');
        for (i, c) in encoded.chars().enumerate() {
            if i > 0 && i % LINE_WIDTH == 0 {
                out.push('\n');
            }
            out.push(c);
        }
        out.push('\n');
        out.push_str(PRIVATE_KEY_END);
        out.push('\n');
        out
    }

    /// Decode an `ssh-ed25519 <base64> [comment]` line
    pub fn decode_public(&self, text: &str) -> Result<[u8; PUBLIC_KEY_SIZE]> {
        let mut tokens = text.split_whitespace();

        match tokens.next() {
            Some(KEY_TYPE) => {}
            Some(other) => {
                return Err(Error::InvalidKeyFormat(format!(
                    "expected key type '{}', found '{}'",
                    KEY_TYPE, other
                )))
            }
            None => return Err(Error::InvalidKeyFormat("empty public key".into())),
        }

        let body = tokens
            .next()
            .ok_or_else(|| Error::InvalidKeyFormat("public key has no key data".into()))?;

        let bytes = STANDARD
            .decode(body)
            .map_err(|e| Error::InvalidKeyFormat(format!("invalid base64 in public key: {}", e)))?;

        bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidKeyFormat(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })
    }

    /// Decode framed private key text into its `secret ‖ public` payload
    pub fn decode_private(&self, text: &str) -> Result<Zeroizing<Vec<u8>>> {
        let start = text
            .find(PRIVATE_KEY_BEGIN)
            .ok_or_else(|| Error::InvalidKeyFormat("missing private key begin marker".into()))?
            + PRIVATE_KEY_BEGIN.len();

        let len = text[start..]
            .find(PRIVATE_KEY_END)
            .ok_or_else(|| Error::InvalidKeyFormat("missing private key end marker".into()))?;

        let body: Zeroizing<String> = Zeroizing::new(
            text[start..start + len]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
        );

        let payload = Zeroizing::new(STANDARD.decode(body.as_bytes()).map_err(|e| {
            Error::InvalidKeyFormat(format!("invalid base64 in private key: {}", e))
        })?);

        if payload.len() < MIN_PRIVATE_PAYLOAD {
            return Err(Error::InvalidKeyFormat(format!(
                "private key payload must be at least {} bytes, got {}",
                MIN_PRIVATE_PAYLOAD,
                payload.len()
            )));
        }

        Ok(payload)
    }

    /// Encode all three host-facing strings for a derived key
    pub fn encode_key(&self, path: &DerivationPath, key_pair: &KeyPair) -> EncodedKey {
        EncodedKey {
            private_key: self.encode_key_pair_private(key_pair),
            public_key: self.encode_public(&key_pair.public_bytes()),
            path_descriptor: self.path_descriptor(path),
        }
    }

    /// `Derivation Path: <path>`
    pub fn path_descriptor(&self, path: &DerivationPath) -> String {
        format!("{}{}", PATH_DESCRIPTOR_PREFIX, path)
    }

    /// Read a path back out of a descriptor line
    pub fn parse_path_descriptor(&self, text: &str) -> Result<DerivationPath> {
        let text = text.trim();
        let prefix = PATH_DESCRIPTOR_PREFIX.trim_end();
        let path = text
            .strip_prefix(prefix)
            .ok_or_else(|| Error::invalid_path(text, format!("expected '{}' prefix", prefix)))?;
        DerivationPath::parse(path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
