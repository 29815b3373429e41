//! Application coordinator.
//!
//! `AppModule` ties together the settings tree, the conversion service, the
//! I/O system, the message log, the node properties providers and the
//! per-entity mesh overrides. It is built once by the composition root and
//! passed down explicitly.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use partview_config::{
    ConversionError, LoadReport, Property, PropertyGroup, PropertyValueConversion, SaveReport,
    Settings, SettingsSink, SettingsSource, Variant,
};
use partview_core::{TaskProgress, TreeNodeRef};
use partview_io::{Format, IoSystem, ParametersProvider};
use partview_mesh::{
    compute_meshes, MeshEntity, MeshError, MeshOverrides, MeshParameters, MeshParametersResolver,
    MeshReport, Mesher,
};

use crate::message_log::{MessageLog, MessageType, Messenger};
use crate::properties::{self, TextOptions, KEY_RECENT_FILES, LANGUAGES};
use crate::providers::{DocumentTreeNodePropertiesProvider, PropertiesProviders};
use crate::recent_files::{PropertyRecentFiles, RecentFile, RecentFiles, RecentFilesConverter, Thumbnail};

/// Non-persistent properties are never loaded nor saved
fn exclude_non_persistent(property: &dyn Property) -> bool {
    !property.meta().persistent
}

pub struct AppModule {
    settings: Settings,
    conversion: PropertyValueConversion,
    io: IoSystem,
    message_log: Arc<MessageLog>,
    providers: PropertiesProviders,
    mesh_overrides: MeshOverrides,
}

impl Default for AppModule {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModule {
    pub fn new() -> Self {
        Self::with_message_log(Arc::new(MessageLog::new()))
    }

    /// Module appending to an existing (possibly shared) message log
    pub fn with_message_log(message_log: Arc<MessageLog>) -> Self {
        let mut conversion = PropertyValueConversion::new();
        conversion.register::<PropertyRecentFiles, _>(RecentFilesConverter);
        Self {
            settings: properties::default_settings(),
            conversion,
            io: IoSystem::new(),
            message_log,
            providers: PropertiesProviders::new(),
            mesh_overrides: MeshOverrides::new(),
        }
    }

    // -- Settings ----------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Predicate selecting the properties left out of load and save
    pub fn exclude_setting_predicate(&self) -> fn(&dyn Property) -> bool {
        exclude_non_persistent
    }

    /// Load persisted values. Properties that cannot be applied keep their
    /// value and are reported as warnings in the message log.
    pub fn load_settings(&mut self, source: &dyn SettingsSource) -> LoadReport {
        let report = self
            .settings
            .load_from(source, &self.conversion, exclude_non_persistent);
        for failure in &report.failures {
            self.emit_warning(&format!("Setting not loaded, {}", failure));
        }
        report
    }

    pub fn save_settings(&self, sink: &mut dyn SettingsSink) -> SaveReport {
        let report = self.settings.save_as(sink, &self.conversion, exclude_non_persistent);
        for failure in &report.failures {
            self.emit_warning(&format!("Setting not saved, {}", failure));
        }
        report
    }

    pub fn languages(&self) -> &'static [(&'static str, &'static str)] {
        &LANGUAGES
    }

    pub fn language_code(&self) -> &'static str {
        properties::language_code(&self.settings)
    }

    pub fn text_options(&self) -> TextOptions {
        properties::text_options(&self.settings)
    }

    // -- Conversion --------------------------------------------------------

    pub fn conversion(&self) -> &PropertyValueConversion {
        &self.conversion
    }

    /// Register converters of additional property kinds here
    pub fn conversion_mut(&mut self) -> &mut PropertyValueConversion {
        &mut self.conversion
    }

    pub fn to_variant(&self, property: &dyn Property) -> Result<Variant, ConversionError> {
        self.conversion.to_variant(property)
    }

    pub fn from_variant(&self, property: &mut dyn Property, variant: &Variant) -> Result<(), ConversionError> {
        self.conversion.from_variant(property, variant)
    }

    /// Current value of the setting at `key`, None if there is no such property
    pub fn setting_variant(&self, key: &str) -> Option<Result<Variant, ConversionError>> {
        self.settings
            .find_property(key)
            .map(|p| self.conversion.to_variant(p))
    }

    /// Assign the setting at `key`. Returns Ok(false) if there is no such property.
    pub fn set_setting(&mut self, key: &str, variant: &Variant) -> Result<bool, ConversionError> {
        let Some(property) = self.settings.find_property_mut(key) else {
            return Ok(false);
        };
        self.conversion.from_variant(property, variant)?;
        Ok(true)
    }

    // -- Message log -------------------------------------------------------

    pub fn message_log(&self) -> &Arc<MessageLog> {
        &self.message_log
    }

    pub fn clear_message_log(&self) {
        self.message_log.clear();
    }

    // -- Recent files ------------------------------------------------------

    pub fn recent_files(&self) -> Option<&RecentFiles> {
        self.settings
            .property::<PropertyRecentFiles>(KEY_RECENT_FILES)
            .map(|p| p.value())
    }

    fn recent_files_mut(&mut self) -> Option<&mut RecentFiles> {
        self.settings
            .property_mut::<PropertyRecentFiles>(KEY_RECENT_FILES)
            .map(|p| p.value_mut())
    }

    pub fn prepend_recent_file(&mut self, path: &Path) {
        if let Some(files) = self.recent_files_mut() {
            files.prepend(path);
        }
    }

    pub fn find_recent_file(&self, path: &Path) -> Option<&RecentFile> {
        self.recent_files()?.find(path)
    }

    /// Returns false if `path` is not a recent file
    pub fn record_recent_file_thumbnail(&mut self, path: &Path, thumbnail: Thumbnail, at: DateTime<Utc>) -> bool {
        self.recent_files_mut()
            .map_or(false, |files| files.record_thumbnail(path, thumbnail, at))
    }

    // -- Meshing -----------------------------------------------------------

    pub fn mesh_overrides(&self) -> &MeshOverrides {
        &self.mesh_overrides
    }

    pub fn mesh_overrides_mut(&mut self) -> &mut MeshOverrides {
        &mut self.mesh_overrides
    }

    fn mesh_resolver(&self) -> MeshParametersResolver<'_> {
        MeshParametersResolver::from_settings(&self.settings, &self.mesh_overrides)
    }

    /// Effective tessellation parameters of `entity`
    pub fn mesh_parameters(&self, entity: &MeshEntity) -> MeshParameters {
        self.mesh_resolver().resolve(entity)
    }

    pub fn compute_mesh(&self, entity: &MeshEntity, mesher: &dyn Mesher) -> Result<MeshParameters, MeshError> {
        let params = self.mesh_parameters(entity);
        mesher.mesh(entity, &params).map_err(|message| {
            self.emit_error(&format!("Meshing of entity {} failed: {}", entity.id, message));
            MeshError::Mesher {
                entity: entity.id,
                message,
            }
        })?;
        Ok(params)
    }

    /// Mesh a batch. Failed entities are reported in the message log and
    /// do not stop the others.
    pub fn compute_meshes(
        &self,
        entities: &[MeshEntity],
        mesher: &dyn Mesher,
        progress: Option<&TaskProgress>,
    ) -> MeshReport {
        let report = compute_meshes(&self.mesh_resolver(), entities, mesher, progress);
        for outcome in report.failures() {
            if let Err(error) = &outcome.result {
                self.emit_error(&error.to_string());
            }
        }
        if report.cancelled {
            self.emit_info("Meshing cancelled");
        }
        report
    }

    // -- Properties providers ----------------------------------------------

    pub fn add_properties_provider(&mut self, provider: Box<dyn DocumentTreeNodePropertiesProvider>) {
        self.providers.add_provider(provider);
    }

    /// Properties of `node` from the first matching provider, None when no
    /// registered provider handles it
    pub fn properties(&self, node: TreeNodeRef<'_>) -> Option<PropertyGroup> {
        self.providers.properties_for(node)
    }

    // -- I/O ---------------------------------------------------------------

    pub fn io_system(&self) -> &IoSystem {
        &self.io
    }

    pub fn io_system_mut(&mut self) -> &mut IoSystem {
        &mut self.io
    }

    /// Mount the options of every format known to the I/O system under `io/`
    pub fn register_io_parameters(&mut self) {
        self.io.register_parameters(&mut self.settings);
    }
}

impl ParametersProvider for AppModule {
    fn find_reader_parameters(&self, format: Format) -> Option<&PropertyGroup> {
        self.settings.find_reader_parameters(format.id())
    }

    fn find_writer_parameters(&self, format: Format) -> Option<&PropertyGroup> {
        self.settings.find_writer_parameters(format.id())
    }
}

impl Messenger for AppModule {
    fn emit_message(&self, message_type: MessageType, text: &str) {
        self.message_log.emit_message(message_type, text);
    }
}
