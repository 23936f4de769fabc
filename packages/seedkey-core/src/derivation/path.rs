//! Derivation paths and path templates.
//!
//! ```text
//! m / 44' / 60' / 0' / 0 / 0
//! │   │                    │
//! │   └ hardened segment   └ plain segment
//! └ root marker (required)
//! ```
//!
//! Segments only address keys; they are not walked as a BIP32 tree. The
//! path text itself salts the key material, so `m/44'/0'` and `m/44h/0h`
//! parse to the same segments yet derive different keys.

use serde::{Deserialize, Serialize};

use crate::config::INDEX_PLACEHOLDER;
use crate::error::{Error, Result};

/// Indices at or above this value are reserved for the hardened range
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const ROOT_PREFIX: &str = "m/";

/// One `/`-separated element of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Index without the hardened flag
    pub index: u32,
    /// Whether the segment carried a `'` or `h` suffix
    pub hardened: bool,
}

/// A validated derivation path such as `m/44'/0'/0'/0/3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath {
    text: String,
    segments: Vec<Segment>,
}

impl DerivationPath {
    /// Parse and validate a path
    ///
    /// Surrounding whitespace is trimmed; everything else must match
    /// `m/<index>['|h]/...` with at least one segment and every index
    /// below 2³¹.
    pub fn parse(path: &str) -> Result<Self> {
        let text = path.trim();

        let rest = text
            .strip_prefix(ROOT_PREFIX)
            .ok_or_else(|| Error::invalid_path(text, "must start with 'm/'"))?;

        if rest.is_empty() {
            return Err(Error::invalid_path(text, "no segments after 'm/'"));
        }

        let segments = rest
            .split('/')
            .map(|segment| parse_segment(text, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// The path exactly as it salts the derivation
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parsed segments, root excluded
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments after `m/`
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether every segment is hardened
    pub fn is_fully_hardened(&self) -> bool {
        self.segments.iter().all(|s| s.hardened)
    }
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.text
    }
}

fn parse_segment(path: &str, segment: &str) -> Result<Segment> {
    let (digits, hardened) = match segment
        .strip_suffix('\'')
        .or_else(|| segment.strip_suffix('h'))
    {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_path(
            path,
            format!("malformed segment '{}'", segment),
        ));
    }

    let index: u32 = digits
        .parse()
        .ok()
        .filter(|index| *index < HARDENED_OFFSET)
        .ok_or_else(|| {
            Error::invalid_path(path, format!("index out of range in segment '{}'", segment))
        })?;

    Ok(Segment { index, hardened })
}

/// A path containing an `{i}` placeholder, expanded once per key index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
}

impl PathTemplate {
    /// Parse a template, checking that it expands to valid paths
    pub fn parse(template: &str) -> Result<Self> {
        let template = template.trim();

        if !template.starts_with(ROOT_PREFIX) {
            return Err(Error::invalid_path(template, "must start with 'm/'"));
        }
        if !template.contains(INDEX_PLACEHOLDER) {
            return Err(Error::invalid_path(
                template,
                format!("template has no '{}' placeholder", INDEX_PLACEHOLDER),
            ));
        }

        let parsed = Self {
            template: template.to_string(),
        };
        // Index 0 is representative: the placeholder only ever becomes digits
        parsed.expand(0)?;
        Ok(parsed)
    }

    /// Substitute `index` for every placeholder
    pub fn expand(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::parse(
            &self
                .template
                .replace(INDEX_PLACEHOLDER, &index.to_string()),
        )
    }

    /// The raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
