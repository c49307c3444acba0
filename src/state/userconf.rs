//! Persistence of `platforms/userconf.json`.
//!
//! The file maps platform keys to metadata blocks. Only the `tizen` entry is
//! interpreted; every other key is carried through a save untouched.

use crate::error::{ConfigError, Result};
use crate::metadata::ApplicationMetadata;
use crate::version::is_reusable_version;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Platform key of the Tizen entry
pub const TIZEN_KEY: &str = "tizen";

/// Default location, relative to the working directory
pub const DEFAULT_USERCONF_PATH: &str = "platforms/userconf.json";

/// What the persisted file says about the Tizen metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedMetadata {
    /// No userconf file exists
    Missing,
    /// The file is not a JSON object
    Corrupt(String),
    /// The file has no `tizen` entry
    NoTizenEntry,
    /// The `tizen` entry is incomplete or its version is not reusable
    Invalid(String),
    /// The `tizen` entry can be offered for reuse
    Valid(ApplicationMetadata),
}

/// Loaded userconf document
#[derive(Debug, Clone, Default)]
pub struct UserConf {
    document: Map<String, Value>,
    existed: bool,
    corrupt: Option<String>,
}

impl UserConf {
    /// Whether the file was present when loaded
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Other platforms' entries and the Tizen entry as raw JSON
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Classify the stored Tizen entry. Nothing is partially trusted.
    pub fn cached_metadata(&self) -> CachedMetadata {
        if !self.existed {
            return CachedMetadata::Missing;
        }
        if let Some(reason) = &self.corrupt {
            return CachedMetadata::Corrupt(reason.clone());
        }
        let Some(entry) = self.document.get(TIZEN_KEY) else {
            return CachedMetadata::NoTizenEntry;
        };

        match serde_json::from_value::<ApplicationMetadata>(entry.clone()) {
            Ok(metadata) if is_reusable_version(&metadata.version) => {
                CachedMetadata::Valid(metadata)
            }
            Ok(metadata) => {
                CachedMetadata::Invalid(format!("unusable version '{}'", metadata.version))
            }
            Err(e) => CachedMetadata::Invalid(e.to_string()),
        }
    }

    /// Replace the Tizen entry, keeping every other key.
    pub fn set_tizen(&mut self, metadata: &ApplicationMetadata) -> Result<()> {
        self.document
            .insert(TIZEN_KEY.to_string(), serde_json::to_value(metadata)?);
        Ok(())
    }
}

/// Reads and writes the userconf file
#[derive(Debug, Clone)]
pub struct UserConfStore {
    path: PathBuf,
}

impl UserConfStore {
    /// Store backed by `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing or unparsable file is not an error.
    pub async fn load(&self) -> Result<UserConf> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No userconf at {}", self.path.display());
                return Ok(UserConf::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let conf = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => UserConf {
                document,
                existed: true,
                corrupt: None,
            },
            Ok(other) => UserConf {
                existed: true,
                corrupt: Some(format!("expected a JSON object, found {}", json_kind(&other))),
                ..UserConf::default()
            },
            Err(e) => UserConf {
                existed: true,
                corrupt: Some(e.to_string()),
                ..UserConf::default()
            },
        };
        Ok(conf)
    }

    /// Merge `metadata` into `conf` under `tizen` and rewrite the whole file.
    pub async fn save(&self, conf: &mut UserConf, metadata: &ApplicationMetadata) -> Result<()> {
        conf.set_tizen(metadata)?;

        let serialized =
            serde_json::to_string_pretty(&conf.document).map_err(|e| ConfigError::SaveFailed {
                path: self.path.clone(),
                reason: format!("Failed to serialize userconf: {}", e),
            })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::SaveFailed {
                    path: self.path.clone(),
                    reason: format!("Failed to create {}: {}", parent.display(), e),
                })?;
        }

        // Write to temporary file first (atomic operation)
        let temp_file_path = self.path.with_extension("json.tmp");
        fs::write(&temp_file_path, serialized.as_bytes())
            .await
            .map_err(|e| ConfigError::SaveFailed {
                path: self.path.clone(),
                reason: format!("Failed to write temp file: {}", e),
            })?;
        fs::rename(&temp_file_path, &self.path)
            .await
            .map_err(|e| ConfigError::SaveFailed {
                path: self.path.clone(),
                reason: format!("Failed to rename temp file: {}", e),
            })?;

        conf.existed = true;
        conf.corrupt = None;
        log::info!("Saved Tizen metadata to {}", self.path.display());
        Ok(())
    }
}

impl Default for UserConfStore {
    fn default() -> Self {
        Self::new(DEFAULT_USERCONF_PATH)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metadata(version: &str) -> ApplicationMetadata {
        ApplicationMetadata {
            name: "App".to_string(),
            id: "a1b2c3d4e5".to_string(),
            version: version.to_string(),
            description: "Demo".to_string(),
        }
    }

    async fn load_json(dir: &TempDir, json: &str) -> UserConf {
        let path = dir.path().join("userconf.json");
        std::fs::write(&path, json).unwrap();
        UserConfStore::new(&path).load().await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let conf = UserConfStore::new(dir.path().join("userconf.json"))
            .load()
            .await
            .unwrap();
        assert!(!conf.existed());
        assert_eq!(conf.cached_metadata(), CachedMetadata::Missing);
    }

    #[tokio::test]
    async fn test_no_tizen_entry() {
        let dir = TempDir::new().unwrap();
        let conf = load_json(&dir, r#"{"webos": {"name": "Other"}}"#).await;
        assert_eq!(conf.cached_metadata(), CachedMetadata::NoTizenEntry);
    }

    #[tokio::test]
    async fn test_valid_two_segment_version() {
        let dir = TempDir::new().unwrap();
        let conf = load_json(
            &dir,
            r#"{"tizen": {"name": "App", "id": "a1b2c3d4e5", "version": "1.0", "description": "Demo"}}"#,
        )
        .await;
        assert_eq!(conf.cached_metadata(), CachedMetadata::Valid(metadata("1.0")));
    }

    #[tokio::test]
    async fn test_invalid_versions_are_not_trusted() {
        let dir = TempDir::new().unwrap();
        for version in ["1", "1.2.3.4", "a.b.c"] {
            let json = format!(
                r#"{{"tizen": {{"name": "App", "id": "a1b2c3d4e5", "version": "{version}", "description": "Demo"}}}}"#
            );
            let conf = load_json(&dir, &json).await;
            assert!(
                matches!(conf.cached_metadata(), CachedMetadata::Invalid(_)),
                "version {version} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_incomplete_entry_is_invalid() {
        let dir = TempDir::new().unwrap();
        let conf = load_json(&dir, r#"{"tizen": {"version": "1.0"}}"#).await;
        assert!(matches!(conf.cached_metadata(), CachedMetadata::Invalid(_)));
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let conf = load_json(&dir, "not json").await;
        assert!(conf.existed());
        assert!(matches!(conf.cached_metadata(), CachedMetadata::Corrupt(_)));

        let conf = load_json(&dir, "[1, 2]").await;
        assert!(matches!(conf.cached_metadata(), CachedMetadata::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_save_preserves_other_platforms() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("platforms").join("userconf.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"webos": {"name": "Other"}}"#).unwrap();

        let store = UserConfStore::new(&path);
        let mut conf = store.load().await.unwrap();
        store.save(&mut conf, &metadata("1.0.1")).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["webos"]["name"], "Other");
        assert_eq!(written["tizen"]["version"], "1.0.1");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("platforms").join("userconf.json");
        let store = UserConfStore::new(&path);
        let mut conf = store.load().await.unwrap();

        store.save(&mut conf, &metadata("2.0.0")).await.unwrap();

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.cached_metadata(), CachedMetadata::Valid(metadata("2.0.0")));
    }
}
