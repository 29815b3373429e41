// Application settings tree
// Persisted through a SettingsSource/SettingsSink, see store.rs

use std::collections::BTreeMap;

use crate::conversion::PropertyValueConversion;
use crate::error::PropertyFailure;
use crate::group::{join_key, PropertyGroup};
use crate::property::Property;
use crate::store::{SettingsSink, SettingsSource};

/// Root section holding reader/writer parameters of every registered format
pub const IO_SECTION: &str = "io";

#[derive(Debug, Clone, Default)]
struct FormatGroups {
    reader: Option<String>,
    writer: Option<String>,
}

/// Outcome of `Settings::load_from`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Properties updated from the source
    pub loaded: usize,
    /// Properties rejected by the exclusion predicate
    pub excluded: usize,
    /// Properties with no value in the source
    pub missing: usize,
    pub failures: Vec<PropertyFailure>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of `Settings::save_as`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub saved: usize,
    pub excluded: usize,
    pub failures: Vec<PropertyFailure>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the root property group and the format parameters registry.
///
/// Not synchronized: mutation must be serialized by the caller (usually the
/// primary thread). Shared `&Settings` access from worker threads is fine.
#[derive(Debug, Default)]
pub struct Settings {
    root: PropertyGroup,
    formats: BTreeMap<String, FormatGroups>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &PropertyGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut PropertyGroup {
        &mut self.root
    }

    /// Add a top-level section
    pub fn add_section(&mut self, group: PropertyGroup) -> &mut PropertyGroup {
        self.root.add_group(group)
    }

    pub fn find_group(&self, path: &str) -> Option<&PropertyGroup> {
        self.root.find_group(path)
    }

    pub fn find_property(&self, key: &str) -> Option<&dyn Property> {
        self.root.find_property(key)
    }

    pub fn find_property_mut(&mut self, key: &str) -> Option<&mut dyn Property> {
        self.root.find_property_mut(key)
    }

    pub fn property<P: Property>(&self, key: &str) -> Option<&P> {
        self.root.get::<P>(key)
    }

    pub fn property_mut<P: Property>(&mut self, key: &str) -> Option<&mut P> {
        self.root.get_mut::<P>(key)
    }

    // -- Format parameters -------------------------------------------------

    /// Mount reader/writer parameter groups of a format under `io/<format_id>`.
    ///
    /// Registering a format with no group at all records it as known but
    /// parameterless. Registering again replaces the previous groups.
    pub fn register_format_parameters(
        &mut self,
        format_id: &str,
        reader: Option<PropertyGroup>,
        writer: Option<PropertyGroup>,
    ) {
        let format_path = join_key(IO_SECTION, format_id);
        let mut entry = FormatGroups::default();

        if self.root.group(IO_SECTION).is_none() {
            self.root.add_group(PropertyGroup::new(IO_SECTION).with_label("Import/Export"));
        }
        if let Some(io) = self.root.group_mut(IO_SECTION) {
            io.remove(format_id);
            if reader.is_some() || writer.is_some() {
                let format_group = io.add_group(PropertyGroup::new(format_id));
                if let Some(mut group) = reader {
                    group.set_name("reader");
                    format_group.add_group(group);
                    entry.reader = Some(join_key(&format_path, "reader"));
                }
                if let Some(mut group) = writer {
                    group.set_name("writer");
                    format_group.add_group(group);
                    entry.writer = Some(join_key(&format_path, "writer"));
                }
            }
        }

        log::debug!(
            "Registered parameters for format '{}' (reader: {}, writer: {})",
            format_id,
            entry.reader.is_some(),
            entry.writer.is_some()
        );
        self.formats.insert(format_id.to_string(), entry);
    }

    /// None both for unknown formats and formats without reader options
    pub fn find_reader_parameters(&self, format_id: &str) -> Option<&PropertyGroup> {
        let path = self.formats.get(format_id)?.reader.as_deref()?;
        self.root.find_group(path)
    }

    /// None both for unknown formats and formats without writer options
    pub fn find_writer_parameters(&self, format_id: &str) -> Option<&PropertyGroup> {
        let path = self.formats.get(format_id)?.writer.as_deref()?;
        self.root.find_group(path)
    }

    pub fn find_reader_parameters_mut(&mut self, format_id: &str) -> Option<&mut PropertyGroup> {
        let path = self.formats.get(format_id)?.reader.clone()?;
        self.root.find_group_mut(&path)
    }

    pub fn find_writer_parameters_mut(&mut self, format_id: &str) -> Option<&mut PropertyGroup> {
        let path = self.formats.get(format_id)?.writer.clone()?;
        self.root.find_group_mut(&path)
    }

    /// Registered format identifiers, sorted
    pub fn format_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.formats.keys().map(String::as_str)
    }

    // -- Persistence -------------------------------------------------------

    /// Update every non-excluded property from `source`.
    ///
    /// A property whose stored value cannot be applied keeps its current
    /// value and is listed in the report; the load goes on with the others.
    pub fn load_from<F>(
        &mut self,
        source: &dyn SettingsSource,
        conversion: &PropertyValueConversion,
        exclude: F,
    ) -> LoadReport
    where
        F: Fn(&dyn Property) -> bool,
    {
        let mut report = LoadReport::default();
        self.root.visit_properties_mut(|key, property| {
            if exclude(&*property) {
                report.excluded += 1;
                return;
            }
            let Some(variant) = source.read(key) else {
                report.missing += 1;
                return;
            };
            match conversion.from_variant(property, &variant) {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    log::warn!("Setting '{}' not loaded: {}", key, error);
                    report.failures.push(PropertyFailure {
                        key: key.to_string(),
                        error,
                    });
                }
            }
        });
        log::debug!(
            "Settings loaded: {} loaded, {} excluded, {} missing, {} failed",
            report.loaded,
            report.excluded,
            report.missing,
            report.failures.len()
        );
        report
    }

    /// Write every non-excluded property to `sink`, keyed by its stable key
    pub fn save_as<F>(
        &self,
        sink: &mut dyn SettingsSink,
        conversion: &PropertyValueConversion,
        exclude: F,
    ) -> SaveReport
    where
        F: Fn(&dyn Property) -> bool,
    {
        let mut report = SaveReport::default();
        self.root.visit_properties(|key, property| {
            if exclude(property) {
                report.excluded += 1;
                return;
            }
            match conversion.to_variant(property) {
                Ok(variant) => {
                    sink.write(key, variant);
                    report.saved += 1;
                }
                Err(error) => {
                    log::warn!("Setting '{}' not saved: {}", key, error);
                    report.failures.push(PropertyFailure {
                        key: key.to_string(),
                        error,
                    });
                }
            }
        });
        report
    }

    // -- Defaults ----------------------------------------------------------

    pub fn reset_all(&mut self) {
        self.root.reset_all();
    }

    /// Restore defaults of one group. Returns false if the path is unknown.
    pub fn reset_group(&mut self, path: &str) -> bool {
        match self.root.find_group_mut(path) {
            Some(group) => {
                group.reset_all();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyBool, PropertyExt, PropertyInt, PropertyReal, PropertyString};
    use crate::store::MemoryStore;
    use crate::variant::Variant;
    use crate::ConversionError;

    fn sample_settings() -> Settings {
        let mut settings = Settings::new();
        settings.add_section(
            PropertyGroup::new("application")
                .with_property(PropertyString::new("language", "en".to_string()))
                .with_property(PropertyInt::new("decimals", 2))
                .with_property(PropertyString::new("session", String::new()).transient()),
        );
        settings.add_section(
            PropertyGroup::new("meshing")
                .with_property(PropertyReal::new("chordalDeflection", 1.0).positive())
                .with_property(PropertyBool::new("relative", false)),
        );
        settings
    }

    fn not_persistent(p: &dyn Property) -> bool {
        !p.meta().persistent
    }

    #[test]
    fn test_save_skips_excluded() {
        let settings = sample_settings();
        let mut store = MemoryStore::new();
        let report = settings.save_as(&mut store, &PropertyValueConversion::new(), not_persistent);
        assert!(report.is_ok());
        assert_eq!(report.saved, 4);
        assert_eq!(report.excluded, 1);
        assert!(store.get("application/session").is_none());
        assert_eq!(store.get("meshing/relative"), Some(&Variant::Bool(false)));
    }

    #[test]
    fn test_load_leaves_excluded_untouched() {
        let mut settings = sample_settings();
        let mut store = MemoryStore::new();
        store.insert("application/session", Variant::String("abc".into()));
        store.insert("application/decimals", Variant::Int(5));
        let report = settings.load_from(&store, &PropertyValueConversion::new(), not_persistent);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.missing, 3);
        assert_eq!(settings.property::<PropertyString>("application/session").unwrap().value(), "");
        assert_eq!(*settings.property::<PropertyInt>("application/decimals").unwrap().value(), 5);
    }

    #[test]
    fn test_load_isolates_failures() {
        let mut settings = sample_settings();
        let mut store = MemoryStore::new();
        store.insert("application/language", Variant::String("fr".into()));
        store.insert("application/decimals", Variant::Bool(true));
        store.insert("meshing/chordalDeflection", Variant::Real(0.2));
        store.insert("meshing/relative", Variant::Bool(true));

        let report = settings.load_from(&store, &PropertyValueConversion::new(), |_| false);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, "application/decimals");
        assert!(matches!(report.failures[0].error, ConversionError::IncompatibleVariant { .. }));
        assert_eq!(report.loaded, 3);
        assert_eq!(*settings.property::<PropertyInt>("application/decimals").unwrap().value(), 2);
        assert_eq!(settings.property::<PropertyString>("application/language").unwrap().value(), "fr");
        assert!(*settings.property::<PropertyBool>("meshing/relative").unwrap().value());
    }

    #[test]
    fn test_save_then_load_is_noop() {
        let mut settings = sample_settings();
        settings
            .property_mut::<PropertyReal>("meshing/chordalDeflection")
            .unwrap()
            .set_value(0.05)
            .unwrap();
        let conversion = PropertyValueConversion::new();
        let mut store = MemoryStore::new();
        settings.save_as(&mut store, &conversion, not_persistent);

        let mut before = MemoryStore::new();
        settings.save_as(&mut before, &conversion, |_| false);
        let report = settings.load_from(&store, &conversion, not_persistent);
        assert!(report.is_ok());
        let mut after = MemoryStore::new();
        settings.save_as(&mut after, &conversion, |_| false);
        assert_eq!(before, after);
    }

    #[test]
    fn test_format_parameters() {
        let mut settings = sample_settings();
        settings.register_format_parameters(
            "step",
            Some(PropertyGroup::new("StepReader").with_property(PropertyBool::new("readNames", true))),
            None,
        );
        settings.register_format_parameters("brep", None, None);

        let reader = settings.find_reader_parameters("step").unwrap();
        assert_eq!(reader.name(), "reader");
        assert!(reader.property("readNames").is_some());
        assert!(settings.find_writer_parameters("step").is_none());
        assert!(settings.find_reader_parameters("brep").is_none());
        assert!(settings.find_reader_parameters("unknown").is_none());
        assert!(settings.find_property("io/step/reader/readNames").is_some());
        assert_eq!(settings.format_ids().collect::<Vec<_>>(), vec!["brep", "step"]);

        // format groups take part in persistence like any other section
        let mut store = MemoryStore::new();
        settings.save_as(&mut store, &PropertyValueConversion::new(), |_| false);
        assert_eq!(store.get("io/step/reader/readNames"), Some(&Variant::Bool(true)));
    }

    #[test]
    fn test_reregister_replaces_groups() {
        let mut settings = Settings::new();
        settings.register_format_parameters(
            "stl",
            None,
            Some(PropertyGroup::new("w").with_property(PropertyBool::new("binary", true))),
        );
        settings.register_format_parameters(
            "stl",
            None,
            Some(PropertyGroup::new("w").with_property(PropertyInt::new("precision", 6))),
        );
        let writer = settings.find_writer_parameters_mut("stl").unwrap();
        assert!(writer.property("binary").is_none());
        assert!(writer.property("precision").is_some());
    }

    #[test]
    fn test_reset_group() {
        let mut settings = sample_settings();
        settings.property_mut::<PropertyBool>("meshing/relative").unwrap().set_value(true).unwrap();
        settings.property_mut::<PropertyInt>("application/decimals").unwrap().set_value(6).unwrap();
        assert!(settings.reset_group("meshing"));
        assert!(!settings.reset_group("nowhere"));
        assert!(settings.find_property("meshing/relative").unwrap().is_default());
        assert!(!settings.find_property("application/decimals").unwrap().is_default());
        settings.reset_all();
        assert!(settings.find_property("application/decimals").unwrap().is_default());
    }
}
