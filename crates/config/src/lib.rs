// Configuration model: typed properties, property groups and settings

pub mod conversion;
pub mod enumeration;
pub mod error;
pub mod group;
pub mod property;
pub mod settings;
pub mod store;
pub mod variant;

pub use conversion::{PropertyValueConversion, VariantConverter, VariantValue};
pub use enumeration::{EnumItem, Enumeration};
pub use error::{ConversionError, PropertyError, PropertyFailure, StoreError};
pub use group::{GroupEntry, PropertyGroup};
pub use property::{
    Property, PropertyBool, PropertyColor, PropertyEnumeration, PropertyExt, PropertyFilePath,
    PropertyInt, PropertyMeta, PropertyReal, PropertyString, PropertyType, PropertyValue, RangeMode,
};
pub use settings::{LoadReport, SaveReport, Settings};
pub use store::{FileStore, MemoryStore, SettingsSink, SettingsSource, StoreFormat};
pub use variant::Variant;

/// Framework-agnostic RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert from hex u32 (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b, a: 1.0 }
    }

    /// Hex string "#rrggbb", alpha dropped
    pub fn to_hex_string(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }

    /// All channels within [0, 1]
    pub fn is_normalized(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}
