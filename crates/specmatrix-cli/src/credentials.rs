//! Local store for the generation-service API key.
//!
//! The key lives in `<config_dir>/specmatrix/credentials.toml` under the
//! single fixed key `gemini_api_key`. It is read once at startup and written
//! only by `specmatrix key set`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the API key is stored.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// Environment variable consulted before the store.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Overrides the directory holding `credentials.toml`.
pub const CONFIG_DIR_ENV: &str = "SPECMATRIX_CONFIG_DIR";

const FILE_NAME: &str = "credentials.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gemini_api_key: Option<String>,
}

/// Where a resolved API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySource {
    Flag,
    Environment,
    Store,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "--api-key"),
            Self::Environment => write!(f, "{API_KEY_ENV}"),
            Self::Store => write!(f, "credential store"),
        }
    }
}

/// File-backed credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, honouring `SPECMATRIX_CONFIG_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration directory can be determined.
    pub fn locate() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine configuration directory"))?
                .join("specmatrix"),
        };
        Ok(Self::new(dir.join(FILE_NAME)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored key, if any. A blank stored value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let file: CredentialFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok(file
            .gemini_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }

    /// Persist `key` (trimmed) and return the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank key or when the file cannot be written.
    pub fn save(&self, key: &str) -> Result<String> {
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("API key must not be empty");
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string(&CredentialFile {
            gemini_api_key: Some(key.to_string()),
        })?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        restrict_permissions(&self.path)?;

        Ok(key.to_string())
    }

    /// Remove the stored key. Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to delete {}", self.path.display()))?;
        Ok(true)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Pick the API key: flag, then environment, then store. Blank values are
/// skipped.
#[must_use]
pub fn resolve_api_key(
    flag: Option<&str>,
    env: Option<&str>,
    stored: Option<&str>,
) -> Option<(String, KeySource)> {
    [
        (flag, KeySource::Flag),
        (env, KeySource::Environment),
        (stored, KeySource::Store),
    ]
    .into_iter()
    .find_map(|(value, source)| {
        let value = value?.trim();
        (!value.is_empty()).then(|| (value.to_string(), source))
    })
}

/// Key with everything but the first and last four characters hidden.
///
/// ```
/// use specmatrix_cli::credentials::mask_key;
///
/// assert_eq!(mask_key("AIzaSyExample1234"), "AIza…1234");
/// assert_eq!(mask_key("short"), "*****");
/// ```
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("specmatrix").join(FILE_NAME));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_save_trims_and_loads() {
        let (_dir, store) = store();
        assert_eq!(store.save("  abc123  \n").unwrap(), "abc123");
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains(CREDENTIAL_KEY));
    }

    #[test]
    fn test_save_rejects_blank() {
        let (_dir, store) = store();
        assert!(store.save("   ").is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_removes_key() {
        let (_dir, store) = store();
        store.save("abc").unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_blank_stored_value_is_absent() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "gemini_api_key = \"  \"\n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(
            resolve_api_key(Some("flag"), Some("env"), Some("stored")),
            Some(("flag".to_string(), KeySource::Flag))
        );
        assert_eq!(
            resolve_api_key(None, Some("env"), Some("stored")),
            Some(("env".to_string(), KeySource::Environment))
        );
        assert_eq!(
            resolve_api_key(Some(" "), Some(""), Some("stored")),
            Some(("stored".to_string(), KeySource::Store))
        );
        assert_eq!(resolve_api_key(None, None, None), None);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("0123456789"), "0123…6789");
        assert_eq!(mask_key(""), "");
    }
}
