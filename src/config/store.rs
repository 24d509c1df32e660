use super::schema::MirrorConfig;
use crate::error::{ConfigError, Result};
use anyhow::Context;
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Owns the on-disk configuration document.
///
/// `save` replaces the backing file atomically (write temp, then rename) and
/// refreshes an in-memory last-known-good copy used by [`ConfigStore::secret`].
/// `update` serializes the whole read-modify-write cycle under one lock, so
/// concurrent patches from different entry points cannot lose each other's
/// writes.
pub struct ConfigStore {
    path: PathBuf,
    cache: Mutex<Option<MirrorConfig>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Default document location: `~/.lookingglass/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().context("could not determine home directory")?;
        Ok(user_dirs
            .home_dir()
            .join(".lookingglass")
            .join("config.json"))
    }

    /// Startup entry point: open the store, writing a default document first
    /// if none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if !store.path.exists() {
            if let Some(dir) = store.path.parent() {
                fs::create_dir_all(dir).map_err(ConfigError::Io)?;
            }
            store.save(&MirrorConfig::default())?;
            tracing::info!(path = %store.path.display(), "wrote default config document");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<MirrorConfig>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read and validate the full document from disk.
    ///
    /// Fails with [`ConfigError::NotFound`] when the backing file is absent.
    /// Missing optional fields take their defaults; `osMode` backfills to
    /// "default" for files written before modes existed.
    pub fn load(&self) -> Result<MirrorConfig> {
        self.load_unlocked()
    }

    /// Serialize the full document and replace the backing file atomically,
    /// then refresh the last-known-good cache.
    pub fn save(&self, doc: &MirrorConfig) -> Result<()> {
        self.save_unlocked(doc)?;
        *self.lock_cache() = Some(doc.clone());
        Ok(())
    }

    /// Read-modify-write of the full document under the store lock.
    ///
    /// The mutation sees (and patches) a complete in-memory copy; the whole
    /// document is written back. Returns the saved document.
    pub fn update<F>(&self, mutate: F) -> Result<MirrorConfig>
    where
        F: FnOnce(&mut MirrorConfig),
    {
        // Hold the cache lock across load → mutate → save so concurrent
        // updates serialize instead of interleaving last-write-wins.
        let mut cache = self.lock_cache();
        let mut doc = self.load_unlocked()?;
        mutate(&mut doc);
        self.save_unlocked(&doc)?;
        *cache = Some(doc.clone());
        Ok(doc)
    }

    fn load_unlocked(&self) -> Result<MirrorConfig> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()).into());
        }
        let raw = fs::read_to_string(&self.path).map_err(ConfigError::Io)?;
        let doc: MirrorConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(doc)
    }

    fn save_unlocked(&self, doc: &MirrorConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(ConfigError::Io)?;
        fs::rename(&tmp, &self.path).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Look up a credential by name: the cached document's `apiKeys` first,
    /// then the environment, else empty string. Secrets are never required;
    /// absence degrades the dependent service to its documented fallback.
    pub fn secret(&self, name: &str) -> String {
        let mut cache = self.lock_cache();
        if cache.is_none() {
            if let Ok(doc) = self.load_unlocked() {
                *cache = Some(doc);
            }
        }
        if let Some(doc) = cache.as_ref() {
            if let Some(keys) = doc.api_keys.as_ref() {
                if let Some(value) = keys.get(name) {
                    if !value.is_empty() {
                        return value.clone();
                    }
                }
            }
        }
        std::env::var(name).unwrap_or_default()
    }
}
