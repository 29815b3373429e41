// Application sections of the settings tree

use std::path::PathBuf;
use std::sync::Arc;

use partview_config::{
    Color, Enumeration, PropertyColor, PropertyEnumeration, PropertyExt, PropertyFilePath,
    PropertyGroup, PropertyInt, RangeMode, Settings,
};
use partview_mesh::meshing_group;

use crate::recent_files::PropertyRecentFiles;

pub const APPLICATION_SECTION: &str = "application";
pub const GRAPHICS_SECTION: &str = "graphics";

pub const KEY_LANGUAGE: &str = "application/language";
pub const KEY_UNIT_SYSTEM_SCHEMA: &str = "application/unitSystemSchema";
pub const KEY_UNIT_SYSTEM_DECIMALS: &str = "application/unitSystemDecimals";
pub const KEY_RECENT_FILES: &str = "application/recentFiles";
pub const KEY_LAST_OPEN_DIR: &str = "application/lastOpenDir";
pub const KEY_DEFAULT_SHAPE_COLOR: &str = "graphics/defaultShapeColor";

/// Supported UI languages: (code, label)
pub const LANGUAGES: [(&str, &str); 3] = [("en", "English"), ("fr", "Français"), ("zh", "简体中文")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystemSchema {
    Si,
    ImperialUk,
}

impl UnitSystemSchema {
    pub fn value(&self) -> i64 {
        match self {
            UnitSystemSchema::Si => 0,
            UnitSystemSchema::ImperialUk => 1,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(UnitSystemSchema::Si),
            1 => Some(UnitSystemSchema::ImperialUk),
            _ => None,
        }
    }

    fn enumeration() -> Arc<Enumeration> {
        Arc::new(
            Enumeration::new()
                .with_item(0, "SI", "SI")
                .with_item(1, "ImperialUK", "Imperial UK"),
        )
    }
}

/// How quantities are formatted for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    pub unit_schema: UnitSystemSchema,
    pub decimals: i64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            unit_schema: UnitSystemSchema::Si,
            decimals: 2,
        }
    }
}

fn language_enumeration() -> Arc<Enumeration> {
    let e = LANGUAGES
        .iter()
        .enumerate()
        .fold(Enumeration::new(), |e, (i, (code, label))| e.with_item(i as i64, code, label));
    Arc::new(e)
}

pub fn application_group() -> PropertyGroup {
    PropertyGroup::new(APPLICATION_SECTION)
        .with_label("Application")
        .with_property(
            PropertyEnumeration::new("language", language_enumeration(), 0)
                .with_label("Language")
                .with_description("Language used for the user interface, applied on next start"),
        )
        .with_property(
            PropertyEnumeration::new(
                "unitSystemSchema",
                UnitSystemSchema::enumeration(),
                UnitSystemSchema::Si.value(),
            )
            .with_label("Unit system"),
        )
        .with_property(
            PropertyInt::new("unitSystemDecimals", TextOptions::default().decimals)
                .with_range(1, 99, RangeMode::Reject)
                .with_label("Decimals")
                .with_description("Count of decimals when displaying quantities"),
        )
        .with_property(PropertyRecentFiles::new("recentFiles").with_label("Recent files").hidden())
        .with_property(
            PropertyFilePath::new("lastOpenDir", PathBuf::new())
                .with_label("Last open folder")
                .hidden(),
        )
}

pub fn graphics_group() -> PropertyGroup {
    PropertyGroup::new(GRAPHICS_SECTION).with_label("Graphics").with_property(
        PropertyColor::new("defaultShapeColor", Color::from_hex(0x999999))
            .normalized()
            .with_label("Default shape color"),
    )
}

/// Settings tree with every built-in section mounted
pub fn default_settings() -> Settings {
    let mut settings = Settings::new();
    settings.add_section(application_group());
    settings.add_section(meshing_group());
    settings.add_section(graphics_group());
    settings
}

/// Current language code, "en" if unset
pub fn language_code(settings: &Settings) -> &'static str {
    settings
        .property::<PropertyEnumeration>(KEY_LANGUAGE)
        .and_then(|p| usize::try_from(p.value()).ok())
        .and_then(|i| LANGUAGES.get(i))
        .map(|(code, _)| *code)
        .unwrap_or("en")
}

pub fn text_options(settings: &Settings) -> TextOptions {
    let mut options = TextOptions::default();
    if let Some(schema) = settings
        .property::<PropertyEnumeration>(KEY_UNIT_SYSTEM_SCHEMA)
        .and_then(|p| UnitSystemSchema::from_value(p.value()))
    {
        options.unit_schema = schema;
    }
    if let Some(p) = settings.property::<PropertyInt>(KEY_UNIT_SYSTEM_DECIMALS) {
        options.decimals = *p.value();
    }
    options
}
