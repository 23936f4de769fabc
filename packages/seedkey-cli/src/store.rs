//! On-disk key layout.
//!
//! ```text
//! <out>/
//! ├── key-1/
//! │   ├── id_ed25519        (0600)
//! │   ├── id_ed25519.pub    (0644)
//! │   └── derivation.txt    (0644)
//! ├── key-2/
//! └── ...
//! ```

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use seedkey_core::{DerivationPath, EncodedKey, SshEncoder};

pub const PRIVATE_KEY_FILE: &str = "id_ed25519";
pub const PUBLIC_KEY_FILE: &str = "id_ed25519.pub";
pub const DESCRIPTOR_FILE: &str = "derivation.txt";

const KEY_DIR_PREFIX: &str = "key-";
const PRIVATE_MODE: u32 = 0o600;
const PUBLIC_MODE: u32 = 0o644;

/// A directory of numbered key folders
#[derive(Debug, Clone)]
pub struct KeyStore {
    root: PathBuf,
}

impl KeyStore {
    /// Use `root` as the output directory; `..` components are refused
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.components().any(|c| matches!(c, Component::ParentDir)) {
            bail!(
                "Output directory must not contain '..': {}",
                root.display()
            );
        }
        Ok(Self { root })
    }

    /// Folder for the `n`th key, 1-based
    pub fn key_dir(&self, n: usize) -> PathBuf {
        self.root.join(format!("{}{}", KEY_DIR_PREFIX, n))
    }

    /// Write keys as `key-1`, `key-2`, ...
    ///
    /// Existing files are checked before anything is written, so a refused
    /// run leaves the directory untouched.
    pub fn write_all(&self, keys: &[EncodedKey], force: bool) -> Result<Vec<PathBuf>> {
        if !force {
            for n in 1..=keys.len() {
                let dir = self.key_dir(n);
                for name in [PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, DESCRIPTOR_FILE] {
                    let path = dir.join(name);
                    if path.exists() {
                        bail!(
                            "{} already exists (use --force to overwrite)",
                            path.display()
                        );
                    }
                }
            }
        }

        let mut written = Vec::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            let dir = self.key_dir(i + 1);
            fs::create_dir_all(&dir)
                .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

            write_file(&dir.join(PRIVATE_KEY_FILE), &key.private_key, PRIVATE_MODE)?;
            write_file(
                &dir.join(PUBLIC_KEY_FILE),
                &format!("{}\n", key.public_key),
                PUBLIC_MODE,
            )?;
            write_file(
                &dir.join(DESCRIPTOR_FILE),
                &format!("{}\n", key.path_descriptor),
                PUBLIC_MODE,
            )?;

            tracing::debug!(dir = %dir.display(), "Wrote key");
            written.push(dir);
        }

        tracing::info!(count = written.len(), root = %self.root.display(), "Keys written");
        Ok(written)
    }

    /// Derivation paths recorded in `key-<n>/derivation.txt`, ordered by `n`
    pub fn read_paths(&self) -> Result<Vec<DerivationPath>> {
        let entries = fs::read_dir(&self.root)
            .wrap_err_with(|| format!("Failed to read {}", self.root.display()))?;

        let mut numbered = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(n) = name
                .to_str()
                .and_then(|s| s.strip_prefix(KEY_DIR_PREFIX))
                .and_then(|s| s.parse::<usize>().ok())
            else {
                continue;
            };
            let descriptor = entry.path().join(DESCRIPTOR_FILE);
            if descriptor.is_file() {
                numbered.push((n, descriptor));
            }
        }
        numbered.sort_by_key(|(n, _)| *n);

        let encoder = SshEncoder::new();
        let paths = numbered
            .into_iter()
            .map(|(_, file)| {
                let text = fs::read_to_string(&file)
                    .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
                encoder
                    .parse_path_descriptor(&text)
                    .wrap_err_with(|| format!("Bad descriptor in {}", file.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        if paths.is_empty() {
            return Err(eyre!(
                "No {}<n>/{} files found in {}",
                KEY_DIR_PREFIX,
                DESCRIPTOR_FILE,
                self.root.display()
            ));
        }
        Ok(paths)
    }
}

fn write_file(path: &Path, contents: &str, mode: u32) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options
        .open(path)
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    // The open mode is filtered by the umask and ignored for existing files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .wrap_err_with(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
