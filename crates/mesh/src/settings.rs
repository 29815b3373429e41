// Meshing section of the settings tree

use partview_config::{
    PropertyBool, PropertyEnumeration, PropertyExt, PropertyGroup, PropertyReal, Settings,
};

use crate::params::{auto_deflection, MeshParameters, MeshQuality, DEFAULT_ANGULAR_DEFLECTION};

pub const MESHING_SECTION: &str = "meshing";
pub const KEY_QUALITY: &str = "meshing/quality";
pub const KEY_CHORDAL_DEFLECTION: &str = "meshing/chordalDeflection";
pub const KEY_ANGULAR_DEFLECTION: &str = "meshing/angularDeflection";
pub const KEY_RELATIVE: &str = "meshing/relative";

/// Build the default `meshing` section
pub fn meshing_group() -> PropertyGroup {
    let defaults = MeshDefaults::default();
    PropertyGroup::new(MESHING_SECTION)
        .with_label("Meshing")
        .with_property(
            PropertyEnumeration::new("quality", MeshQuality::enumeration(), defaults.quality.value())
                .with_label("Quality")
                .with_description("Controls tessellation tolerances, 'User defined' uses the values below"),
        )
        .with_property(
            PropertyReal::new("chordalDeflection", defaults.chordal_deflection)
                .positive()
                .with_label("Chordal deflection")
                .with_description("Maximum distance between mesh and surface (user-defined quality)"),
        )
        .with_property(
            PropertyReal::new("angularDeflection", defaults.angular_deflection)
                .positive()
                .with_label("Angular deflection")
                .with_description("Maximum angle between adjacent facets, in radians (user-defined quality)"),
        )
        .with_property(
            PropertyBool::new("relative", defaults.relative)
                .with_label("Relative")
                .with_description("Chordal deflection is relative to edge size (user-defined quality)"),
        )
}

/// Global meshing defaults, as stored in settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshDefaults {
    pub quality: MeshQuality,
    pub chordal_deflection: f64,
    pub angular_deflection: f64,
    pub relative: bool,
}

impl Default for MeshDefaults {
    fn default() -> Self {
        Self {
            quality: MeshQuality::Normal,
            chordal_deflection: 1.0,
            angular_deflection: DEFAULT_ANGULAR_DEFLECTION,
            relative: false,
        }
    }
}

impl MeshDefaults {
    /// Read the meshing section. Missing properties keep the built-in defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut defaults = Self::default();
        if let Some(q) = settings
            .property::<PropertyEnumeration>(KEY_QUALITY)
            .and_then(|p| MeshQuality::from_value(p.value()))
        {
            defaults.quality = q;
        }
        if let Some(p) = settings.property::<PropertyReal>(KEY_CHORDAL_DEFLECTION) {
            defaults.chordal_deflection = *p.value();
        }
        if let Some(p) = settings.property::<PropertyReal>(KEY_ANGULAR_DEFLECTION) {
            defaults.angular_deflection = *p.value();
        }
        if let Some(p) = settings.property::<PropertyBool>(KEY_RELATIVE) {
            defaults.relative = *p.value();
        }
        defaults
    }

    /// Parameters for an entity of the given extent, before any override
    pub fn parameters_for(&self, extent: f64) -> MeshParameters {
        match self.quality.coefficients() {
            None => MeshParameters {
                linear_deflection: self.chordal_deflection,
                angular_deflection: self.angular_deflection,
                relative: self.relative,
                shape_extent: extent,
            },
            Some((chordal, angular)) => MeshParameters {
                linear_deflection: auto_deflection(extent) * chordal,
                angular_deflection: DEFAULT_ANGULAR_DEFLECTION * angular,
                relative: false,
                shape_extent: extent,
            },
        }
    }
}
