//! Persisted local state.
//!
//! The console keeps a handful of values between sessions: the open tabs,
//! the mixed-sider pin flag, theme settings, locale and auth tokens. Each
//! lives under a fixed [`StorageKey`] as an opaque JSON document. There is no
//! schema versioning; the only migration hook is
//! [`LocalStorage::check_override_flag`], which drops the stored theme when
//! the build flag changes.
//!
//! Backends implement [`Storage`] over raw strings. Two ship with the crate:
//! [`MemoryStorage`] and [`FileStorage`] (one JSON object on disk).
//!
//! # Example
//!
//! ```
//! use console_navigator::storage::{LocalStorage, MemoryStorage, StorageKey};
//!
//! let mut storage = LocalStorage::new(MemoryStorage::new());
//! storage.set(StorageKey::Lang, &"en-US").unwrap();
//! assert_eq!(storage.get::<String>(StorageKey::Lang).unwrap().as_deref(), Some("en-US"));
//! ```

use crate::error::NavigationError;
use crate::{debug_log, warn_log};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys the console persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Serialized open tabs.
    GlobalTabs,
    /// `"Y"` / `"N"` pin flag of the mixed sider.
    MixSiderFixed,
    ThemeSettings,
    /// Build-time stamp compared against the running build.
    OverrideThemeFlag,
    Lang,
    Token,
    RefreshToken,
}

impl StorageKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GlobalTabs => "globalTabs",
            Self::MixSiderFixed => "mixSiderFixed",
            Self::ThemeSettings => "themeSettings",
            Self::OverrideThemeFlag => "overrideThemeFlag",
            Self::Lang => "lang",
            Self::Token => "token",
            Self::RefreshToken => "refreshToken",
        }
    }
}

/// A string key/value store.
pub trait Storage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, NavigationError>;

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), NavigationError>;

    fn remove(&mut self, key: &str) -> Result<(), NavigationError>;
}

/// In-memory storage, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, NavigationError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), NavigationError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), NavigationError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file.
///
/// The file is read once on open and rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NavigationError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        debug_log!("Opened storage '{}' ({} entries)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), NavigationError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, NavigationError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), NavigationError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), NavigationError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Typed JSON access to a [`Storage`] backend.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage<S> {
    backend: S,
}

impl<S: Storage> LocalStorage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read and decode the value at `key`.
    ///
    /// A value that no longer decodes is treated as absent and logged.
    pub fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, NavigationError> {
        let Some(raw) = self.backend.get_raw(key.as_str())? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn_log!("Discarding unreadable '{}': {}", key.as_str(), err);
                Ok(None)
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: StorageKey, value: &T) -> Result<(), NavigationError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_raw(key.as_str(), raw)
    }

    pub fn remove(&mut self, key: StorageKey) -> Result<(), NavigationError> {
        self.backend.remove(key.as_str())
    }

    /// The mixed-sider pin flag; absent means unpinned.
    pub fn mix_sider_fixed(&self) -> Result<bool, NavigationError> {
        Ok(self
            .get::<String>(StorageKey::MixSiderFixed)?
            .is_some_and(|flag| flag == "Y"))
    }

    pub fn set_mix_sider_fixed(&mut self, fixed: bool) -> Result<(), NavigationError> {
        self.set(StorageKey::MixSiderFixed, if fixed { "Y" } else { "N" })
    }

    /// Drop stored theme settings when `build_flag` differs from the stored
    /// flag, then record `build_flag`. Returns whether settings were dropped.
    pub fn check_override_flag(&mut self, build_flag: &str) -> Result<bool, NavigationError> {
        let stored = self.get::<String>(StorageKey::OverrideThemeFlag)?;
        if stored.as_deref() == Some(build_flag) {
            return Ok(false);
        }
        debug_log!("Theme override flag changed ({:?} -> '{}')", stored, build_flag);
        self.remove(StorageKey::ThemeSettings)?;
        self.set(StorageKey::OverrideThemeFlag, build_flag)?;
        Ok(true)
    }
}
