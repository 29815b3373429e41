//! Recently opened files.
//!
//! Most recent first, no duplicate paths, bounded length. The list is stored
//! in the settings tree as a `PropertyRecentFiles` and persisted through
//! `RecentFilesConverter` as `[[path, timestamp], ...]`. Thumbnail images
//! stay in memory only.

use std::any::Any;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use partview_config::{ConversionError, Property, PropertyError, PropertyMeta, Variant, VariantConverter};

/// Default number of entries kept
pub const MAX_RECENT_FILES: usize = 10;

/// Width and height of recent-file thumbnails, in pixels
pub const THUMBNAIL_SIZE: (u32, u32) = (190, 150);

/// RGBA8 preview image
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentFile {
    pub path: PathBuf,
    pub thumbnail: Option<Thumbnail>,
    /// When the thumbnail was generated
    pub thumbnail_timestamp: Option<DateTime<Utc>>,
}

impl RecentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            thumbnail: None,
            thumbnail_timestamp: None,
        }
    }

    /// True if there is no thumbnail, or the file changed after it was made
    pub fn is_thumbnail_outdated(&self, file_modified: DateTime<Utc>) -> bool {
        match (&self.thumbnail, self.thumbnail_timestamp) {
            (Some(_), Some(at)) => file_modified > at,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentFiles {
    files: Vec<RecentFile>,
    capacity: usize,
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::with_capacity(MAX_RECENT_FILES)
    }
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn files(&self) -> &[RecentFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Move `path` to the front, keeping its thumbnail if it was already listed
    pub fn prepend(&mut self, path: &Path) {
        let entry = match self.files.iter().position(|f| f.path == path) {
            Some(index) => self.files.remove(index),
            None => RecentFile::new(path),
        };
        self.files.insert(0, entry);
        self.files.truncate(self.capacity);
    }

    pub fn find(&self, path: &Path) -> Option<&RecentFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Attach a thumbnail. Returns false (and changes nothing) if `path` is not listed.
    pub fn record_thumbnail(&mut self, path: &Path, thumbnail: Thumbnail, at: DateTime<Utc>) -> bool {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(file) => {
                file.thumbnail = Some(thumbnail);
                file.thumbnail_timestamp = Some(at);
                true
            }
            None => false,
        }
    }

    /// Later duplicates of a path are dropped, the first entry wins
    fn replace_files(&mut self, mut files: Vec<RecentFile>) {
        let mut seen = HashSet::new();
        files.retain(|f| seen.insert(f.path.clone()));
        files.truncate(self.capacity);
        self.files = files;
    }
}

/// Settings property holding the recent files list
#[derive(Debug, Clone)]
pub struct PropertyRecentFiles {
    meta: PropertyMeta,
    value: RecentFiles,
}

impl PropertyRecentFiles {
    pub fn new(name: &str) -> Self {
        Self {
            meta: PropertyMeta::new(name),
            value: RecentFiles::new(),
        }
    }

    pub fn value(&self) -> &RecentFiles {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut RecentFiles {
        &mut self.value
    }
}

impl Property for PropertyRecentFiles {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> &'static str {
        "recent_files"
    }

    fn reset(&mut self) {
        self.value.clear();
    }

    fn is_default(&self) -> bool {
        self.value.is_empty()
    }

    fn display_value(&self) -> String {
        self.value
            .files()
            .iter()
            .map(|f| f.path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecentFilesConverter;

fn incompatible(found: &Variant) -> ConversionError {
    ConversionError::IncompatibleVariant {
        kind: "recent_files",
        found: found.type_name(),
    }
}

static NO_TIMESTAMP: Variant = Variant::Absent;

fn entry_from_variant(item: &Variant) -> Result<RecentFile, ConversionError> {
    let fields = item.as_list().ok_or_else(|| incompatible(item))?;
    let (path, timestamp) = match fields {
        [path] => (path, &NO_TIMESTAMP),
        [path, timestamp] => (path, timestamp),
        _ => return Err(incompatible(item)),
    };
    let path = path.as_str().ok_or_else(|| incompatible(path))?;
    let thumbnail_timestamp = match timestamp {
        Variant::Absent => None,
        Variant::String(text) => Some(
            DateTime::parse_from_rfc3339(text)
                .map_err(|e| ConversionError::Invalid(PropertyError::Invalid(e.to_string())))?
                .with_timezone(&Utc),
        ),
        other => return Err(incompatible(other)),
    };
    Ok(RecentFile {
        path: PathBuf::from(path),
        thumbnail: None,
        thumbnail_timestamp,
    })
}

impl VariantConverter<PropertyRecentFiles> for RecentFilesConverter {
    fn to_variant(&self, property: &PropertyRecentFiles) -> Variant {
        let items = property
            .value()
            .files()
            .iter()
            .map(|f| {
                let timestamp = f
                    .thumbnail_timestamp
                    .map(|t| Variant::String(t.to_rfc3339()))
                    .unwrap_or(Variant::Absent);
                Variant::List(vec![Variant::String(f.path.to_string_lossy().into_owned()), timestamp])
            })
            .collect();
        Variant::List(items)
    }

    fn from_variant(&self, property: &mut PropertyRecentFiles, variant: &Variant) -> Result<(), ConversionError> {
        let items = variant.as_list().ok_or_else(|| incompatible(variant))?;
        let files = items.iter().map(entry_from_variant).collect::<Result<Vec<_>, _>>()?;
        property.value_mut().replace_files(files);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use partview_config::PropertyValueConversion;

    fn paths(list: &RecentFiles) -> Vec<&Path> {
        list.files().iter().map(|f| f.path.as_path()).collect()
    }

    #[test]
    fn test_prepend_moves_and_truncates() {
        let mut list = RecentFiles::with_capacity(3);
        for p in ["C", "B", "A"] {
            list.prepend(Path::new(p));
        }
        assert_eq!(paths(&list), vec![Path::new("A"), Path::new("B"), Path::new("C")]);

        list.prepend(Path::new("B"));
        assert_eq!(paths(&list), vec![Path::new("B"), Path::new("A"), Path::new("C")]);

        list.prepend(Path::new("D"));
        assert_eq!(paths(&list), vec![Path::new("D"), Path::new("B"), Path::new("A")]);
    }

    #[test]
    fn test_prepend_keeps_thumbnail() {
        let mut list = RecentFiles::new();
        list.prepend(Path::new("a.step"));
        list.prepend(Path::new("b.step"));
        let now = Utc::now();
        assert!(list.record_thumbnail(Path::new("a.step"), Thumbnail::new(1, 1, vec![0; 4]), now));
        list.prepend(Path::new("a.step"));
        assert_eq!(list.files()[0].thumbnail_timestamp, Some(now));
    }

    #[test]
    fn test_record_thumbnail_on_unknown_path() {
        let mut list = RecentFiles::new();
        list.prepend(Path::new("a.step"));
        let before = list.clone();
        assert!(!list.record_thumbnail(Path::new("zzz.step"), Thumbnail::new(1, 1, vec![0; 4]), Utc::now()));
        assert_eq!(list, before);
    }

    #[test]
    fn test_thumbnail_outdated() {
        let now = Utc::now();
        let mut file = RecentFile::new("a.step");
        assert!(file.is_thumbnail_outdated(now));

        file.thumbnail = Some(Thumbnail::new(THUMBNAIL_SIZE.0, THUMBNAIL_SIZE.1, Vec::new()));
        file.thumbnail_timestamp = Some(now);
        assert!(!file.is_thumbnail_outdated(now - Duration::seconds(10)));
        assert!(file.is_thumbnail_outdated(now + Duration::seconds(10)));
    }

    #[test]
    fn test_converter_roundtrip() {
        let mut conversion = PropertyValueConversion::new();
        conversion.register::<PropertyRecentFiles, _>(RecentFilesConverter);

        let mut prop = PropertyRecentFiles::new("recentFiles");
        prop.value_mut().prepend(Path::new("/tmp/b.igs"));
        prop.value_mut().prepend(Path::new("/tmp/a.step"));
        let at = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
        prop.value_mut()
            .record_thumbnail(Path::new("/tmp/a.step"), Thumbnail::new(1, 1, vec![1, 2, 3, 4]), at);

        let variant = conversion.to_variant(&prop).unwrap();
        let mut restored = PropertyRecentFiles::new("recentFiles");
        conversion.from_variant(&mut restored, &variant).unwrap();

        assert_eq!(paths(restored.value()), paths(prop.value()));
        assert_eq!(restored.value().files()[0].thumbnail_timestamp, Some(at));
        assert_eq!(restored.value().files()[0].thumbnail, None);
    }

    #[test]
    fn test_converter_rejects_malformed_without_change() {
        let mut prop = PropertyRecentFiles::new("recentFiles");
        prop.value_mut().prepend(Path::new("keep.step"));
        let bad = Variant::List(vec![
            Variant::List(vec![Variant::String("ok.step".into())]),
            Variant::Int(3),
        ]);
        assert!(RecentFilesConverter.from_variant(&mut prop, &bad).is_err());
        assert_eq!(paths(prop.value()), vec![Path::new("keep.step")]);
    }

    #[test]
    fn test_converter_drops_repeated_paths() {
        let entry = |p: &str, t: Variant| Variant::List(vec![Variant::String(p.into()), t]);
        let stored = Variant::List(vec![
            entry("/a.step", Variant::String("2024-03-01T10:00:00Z".into())),
            entry("/a.step", Variant::Absent),
            entry("/b.step", Variant::Absent),
        ]);
        let mut prop = PropertyRecentFiles::new("recentFiles");
        RecentFilesConverter.from_variant(&mut prop, &stored).unwrap();
        assert_eq!(paths(prop.value()), vec![Path::new("/a.step"), Path::new("/b.step")]);
        assert!(prop.value().files()[0].thumbnail_timestamp.is_some());

        prop.value_mut().prepend(Path::new("/b.step"));
        assert_eq!(paths(prop.value()), vec![Path::new("/b.step"), Path::new("/a.step")]);
    }
}
