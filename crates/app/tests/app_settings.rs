// AppModule persistence through a settings file, and recent-files ordering.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::path::{Path, PathBuf};

use partview_app::properties::{KEY_LANGUAGE, KEY_RECENT_FILES};
use partview_app::{AppModule, RecentFiles};
use partview_config::{FileStore, PropertyBool, PropertyEnumeration, PropertyGroup, Variant};
use partview_core::TaskProgress;
use partview_io::{FactoryReader, Format, IoError, ParametersProvider, Reader};
use proptest::prelude::*;
use tempfile::TempDir;

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

struct NullReader;

impl Reader for NullReader {
    fn apply_properties(&mut self, _params: Option<&PropertyGroup>) {}

    fn read_file(&mut self, _path: &Path, _progress: Option<&TaskProgress>) -> Result<(), IoError> {
        Ok(())
    }
}

struct StepFactory;

impl FactoryReader for StepFactory {
    fn formats(&self) -> &[Format] {
        &[Format::Step]
    }

    fn create(&self, _format: Format) -> Option<Box<dyn Reader>> {
        Some(Box::new(NullReader))
    }

    fn create_properties(&self, _format: Format) -> Option<PropertyGroup> {
        Some(PropertyGroup::new("StepReader").with_property(PropertyBool::new("readColors", true)))
    }
}

fn app_with_io() -> AppModule {
    let mut app = AppModule::new();
    app.io_system_mut().add_factory_reader(Box::new(StepFactory));
    app.register_io_parameters();
    app
}

#[test]
fn test_settings_survive_a_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut app = app_with_io();
    app.settings_mut()
        .property_mut::<PropertyEnumeration>(KEY_LANGUAGE)
        .unwrap()
        .set_by_name("fr")
        .unwrap();
    app.settings_mut()
        .property_mut::<PropertyBool>("io/step/reader/readColors")
        .unwrap()
        .set_value(false)
        .unwrap();
    app.prepend_recent_file(Path::new("/parts/a.step"));
    app.prepend_recent_file(Path::new("/parts/b.iges"));

    let mut store = FileStore::new(&path);
    assert!(app.save_settings(&mut store).is_ok());
    store.save().unwrap();

    let store = FileStore::open(&path).unwrap();
    let mut restored = app_with_io();
    let report = restored.load_settings(&store);
    assert!(report.is_ok());
    assert!(restored.message_log().is_empty());

    assert_eq!(restored.language_code(), "fr");
    let read_colors = restored
        .find_reader_parameters(Format::Step)
        .and_then(|g| g.get::<PropertyBool>("readColors"))
        .map(|p| *p.value());
    assert_eq!(read_colors, Some(false));
    let recent: Vec<&Path> = restored
        .recent_files()
        .unwrap()
        .files()
        .iter()
        .map(|f| f.path.as_path())
        .collect();
    assert_eq!(recent, vec![Path::new("/parts/b.iges"), Path::new("/parts/a.step")]);
}

#[test]
fn test_corrupt_recent_files_entry_is_isolated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = FileStore::new(&path);
    store.entries_mut().insert(KEY_RECENT_FILES, Variant::Int(42));
    store.entries_mut().insert(KEY_LANGUAGE, Variant::Enum(2));

    let mut app = AppModule::new();
    let report = app.load_settings(&store);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, KEY_RECENT_FILES);
    assert_eq!(app.language_code(), "zh");
    assert!(app.recent_files().unwrap().is_empty());
    assert_eq!(app.message_log().len(), 1);
}

// ---------------------------------------------------------------------------
// Recent files
// ---------------------------------------------------------------------------

fn arb_path() -> impl Strategy<Value = PathBuf> {
    (0u8..6).prop_map(|n| PathBuf::from(format!("/parts/{}.step", n)))
}

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn recent_files_are_unique_bounded_and_most_recent_first(
        opened in prop::collection::vec(arb_path(), 0..30),
        capacity in 1usize..5,
    ) {
        let mut list = RecentFiles::with_capacity(capacity);
        for path in &opened {
            list.prepend(path);
        }

        prop_assert!(list.len() <= capacity);

        let mut expected: Vec<&PathBuf> = Vec::new();
        for path in opened.iter().rev() {
            if !expected.contains(&path) {
                expected.push(path);
            }
        }
        expected.truncate(capacity);
        let actual: Vec<&PathBuf> = list.files().iter().map(|f| &f.path).collect();
        prop_assert_eq!(actual, expected);
    }
}
