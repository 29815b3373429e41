// Persisted settings stores
// Default file: ~/.config/partview/settings.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::variant::Variant;

/// Key-value source addressed by property stable key
pub trait SettingsSource {
    fn read(&self, key: &str) -> Option<Variant>;
}

/// Key-value sink addressed by property stable key
pub trait SettingsSink {
    fn write(&mut self, key: &str, value: Variant);
}

/// In-memory store, also the backing map of `FileStore`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Variant>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Variant) -> Option<Variant> {
        self.entries.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Variant> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl SettingsSource for MemoryStore {
    fn read(&self, key: &str) -> Option<Variant> {
        self.entries.get(key).cloned()
    }
}

impl SettingsSink for MemoryStore {
    fn write(&mut self, key: &str, value: Variant) {
        self.entries.insert(key.to_string(), value);
    }
}

impl FromIterator<(String, Variant)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Variant)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// On-disk encoding of a `FileStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Toml,
}

impl StoreFormat {
    /// `.toml` files are TOML, anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => StoreFormat::Toml,
            _ => StoreFormat::Json,
        }
    }
}

/// Flat `key -> Variant` map persisted in a single file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: StoreFormat,
    entries: MemoryStore,
}

impl FileStore {
    /// Get the default settings file path
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("partview");
        config_dir.join("settings.json")
    }

    /// Empty store bound to `path`, nothing is read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            format: StoreFormat::from_path(&path),
            path,
            entries: MemoryStore::new(),
        }
    }

    /// Open `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn entries(&self) -> &MemoryStore {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut MemoryStore {
        &mut self.entries
    }

    /// Re-read the file, replacing in-memory entries
    pub fn reload(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            log::debug!("Settings file {} not found, starting empty", self.path.display());
            self.entries.clear();
            return Ok(());
        }
        let contents = fs::read_to_string(&self.path)?;
        let map: BTreeMap<String, Variant> = match self.format {
            StoreFormat::Json => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");
                if cleaned.trim().is_empty() {
                    BTreeMap::new()
                } else {
                    serde_json::from_str(&cleaned)?
                }
            }
            StoreFormat::Toml => toml::from_str(&contents)?,
        };
        log::debug!("Read {} settings from {}", map.len(), self.path.display());
        self.entries = map.into_iter().collect();
        Ok(())
    }

    /// Write all entries to disk
    pub fn save(&self) -> Result<(), StoreError> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = match self.format {
            StoreFormat::Json => serde_json::to_string_pretty(&self.entries.entries)?,
            StoreFormat::Toml => toml::to_string_pretty(&self.entries.entries)?,
        };
        fs::write(&self.path, contents)?;
        log::debug!("Wrote {} settings to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

impl SettingsSource for FileStore {
    fn read(&self, key: &str) -> Option<Variant> {
        self.entries.read(key)
    }
}

impl SettingsSink for FileStore {
    fn write(&mut self, key: &str, value: Variant) {
        self.entries.write(key, value);
    }
}
