// Lookup of reader/writer options per format

use partview_config::{PropertyGroup, Settings};

use crate::format::Format;

/// Gives the I/O engine the options to apply before reading or writing.
///
/// `None` means "no parameters available": either the format takes no
/// options or it is unknown. Callers needing the distinction check the
/// format against `IoSystem` themselves.
pub trait ParametersProvider {
    fn find_reader_parameters(&self, format: Format) -> Option<&PropertyGroup>;
    fn find_writer_parameters(&self, format: Format) -> Option<&PropertyGroup>;
}

impl ParametersProvider for Settings {
    fn find_reader_parameters(&self, format: Format) -> Option<&PropertyGroup> {
        Settings::find_reader_parameters(self, format.id())
    }

    fn find_writer_parameters(&self, format: Format) -> Option<&PropertyGroup> {
        Settings::find_writer_parameters(self, format.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partview_config::PropertyBool;

    #[test]
    fn test_settings_as_provider() {
        let mut settings = Settings::new();
        settings.register_format_parameters(
            Format::Stl.id(),
            None,
            Some(PropertyGroup::new("StlWriter").with_property(PropertyBool::new("binary", true))),
        );
        let provider: &dyn ParametersProvider = &settings;
        assert!(provider.find_writer_parameters(Format::Stl).is_some());
        assert!(provider.find_reader_parameters(Format::Stl).is_none());
        assert!(provider.find_reader_parameters(Format::Step).is_none());
    }
}
