//! Reader/writer abstractions and the factory registry.
//!
//! A plugin contributes a `FactoryReader` and/or `FactoryWriter`. The
//! factories know which formats they handle, how to instantiate a reader or
//! writer, and which options each format exposes (`create_properties`).
//! `IoSystem::register_parameters` mounts those option groups into the
//! settings tree; `create_reader`/`create_writer` look them up again through
//! a `ParametersProvider` and apply them before handing out the object.

use std::path::Path;

use partview_config::{PropertyGroup, Settings};
use partview_core::TaskProgress;
use thiserror::Error;

use crate::format::Format;
use crate::parameters::ParametersProvider;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("no reader available for {0}")]
    NoReader(Format),
    #[error("no writer available for {0}")]
    NoWriter(Format),
    #[error("operation cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

pub trait Reader: Send {
    /// Apply format options. `None` keeps the reader defaults.
    fn apply_properties(&mut self, params: Option<&PropertyGroup>);

    fn read_file(&mut self, path: &Path, progress: Option<&TaskProgress>) -> Result<(), IoError>;
}

pub trait Writer: Send {
    /// Apply format options. `None` keeps the writer defaults.
    fn apply_properties(&mut self, params: Option<&PropertyGroup>);

    fn write_file(&mut self, path: &Path, progress: Option<&TaskProgress>) -> Result<(), IoError>;
}

pub trait FactoryReader: Send + Sync {
    fn formats(&self) -> &[Format];
    fn create(&self, format: Format) -> Option<Box<dyn Reader>>;
    /// Default options of `format`, None if it takes none
    fn create_properties(&self, format: Format) -> Option<PropertyGroup>;
}

pub trait FactoryWriter: Send + Sync {
    fn formats(&self) -> &[Format];
    fn create(&self, format: Format) -> Option<Box<dyn Writer>>;
    /// Default options of `format`, None if it takes none
    fn create_properties(&self, format: Format) -> Option<PropertyGroup>;
}

/// Registry of reader/writer factories. The first factory registered for a
/// format wins.
#[derive(Default)]
pub struct IoSystem {
    reader_factories: Vec<Box<dyn FactoryReader>>,
    writer_factories: Vec<Box<dyn FactoryWriter>>,
}

fn push_unique(formats: &mut Vec<Format>, extra: &[Format]) {
    for format in extra {
        if !formats.contains(format) {
            formats.push(*format);
        }
    }
}

impl IoSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_factory_reader(&mut self, factory: Box<dyn FactoryReader>) {
        log::debug!("Reader factory added for {:?}", factory.formats());
        self.reader_factories.push(factory);
    }

    pub fn add_factory_writer(&mut self, factory: Box<dyn FactoryWriter>) {
        log::debug!("Writer factory added for {:?}", factory.formats());
        self.writer_factories.push(factory);
    }

    /// Readable formats in registration order
    pub fn reader_formats(&self) -> Vec<Format> {
        let mut formats = Vec::new();
        for factory in &self.reader_factories {
            push_unique(&mut formats, factory.formats());
        }
        formats
    }

    /// Writable formats in registration order
    pub fn writer_formats(&self) -> Vec<Format> {
        let mut formats = Vec::new();
        for factory in &self.writer_factories {
            push_unique(&mut formats, factory.formats());
        }
        formats
    }

    pub fn find_factory_reader(&self, format: Format) -> Option<&dyn FactoryReader> {
        self.reader_factories
            .iter()
            .find(|f| f.formats().contains(&format))
            .map(|f| f.as_ref())
    }

    pub fn find_factory_writer(&self, format: Format) -> Option<&dyn FactoryWriter> {
        self.writer_factories
            .iter()
            .find(|f| f.formats().contains(&format))
            .map(|f| f.as_ref())
    }

    /// Format of `path` if some registered reader handles it
    pub fn probe_format(&self, path: &Path) -> Option<Format> {
        let format = Format::from_path(path)?;
        self.find_factory_reader(format).map(|_| format)
    }

    /// Mount the default options of every readable/writable format into `settings`
    pub fn register_parameters(&self, settings: &mut Settings) {
        let mut formats = self.reader_formats();
        push_unique(&mut formats, &self.writer_formats());
        for format in formats {
            let reader = self
                .find_factory_reader(format)
                .and_then(|f| f.create_properties(format));
            let writer = self
                .find_factory_writer(format)
                .and_then(|f| f.create_properties(format));
            settings.register_format_parameters(format.id(), reader, writer);
        }
    }

    /// Instantiate a reader for `format` with its options applied
    pub fn create_reader(
        &self,
        format: Format,
        parameters: &dyn ParametersProvider,
    ) -> Result<Box<dyn Reader>, IoError> {
        let mut reader = self
            .find_factory_reader(format)
            .and_then(|f| f.create(format))
            .ok_or(IoError::NoReader(format))?;
        reader.apply_properties(parameters.find_reader_parameters(format));
        Ok(reader)
    }

    /// Instantiate a writer for `format` with its options applied
    pub fn create_writer(
        &self,
        format: Format,
        parameters: &dyn ParametersProvider,
    ) -> Result<Box<dyn Writer>, IoError> {
        let mut writer = self
            .find_factory_writer(format)
            .and_then(|f| f.create(format))
            .ok_or(IoError::NoWriter(format))?;
        writer.apply_properties(parameters.find_writer_parameters(format));
        Ok(writer)
    }
}
