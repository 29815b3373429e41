use std::collections::HashMap;
use std::sync::Arc;

use partview_config::Enumeration;
use partview_core::EntityId;

/// Angular deflection of the `Normal` quality, in radians (20 degrees)
pub const DEFAULT_ANGULAR_DEFLECTION: f64 = 20.0 * std::f64::consts::PI / 180.0;

/// Smallest linear deflection produced by the automatic rule
pub const MIN_AUTO_DEFLECTION: f64 = 1e-4;

/// Tessellation tolerances for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParameters {
    /// Maximum chordal distance between the mesh and the surface
    pub linear_deflection: f64,
    /// Maximum angle between adjacent mesh facets, in radians
    pub angular_deflection: f64,
    /// Linear deflection is relative to edge size
    pub relative: bool,
    /// Extent (bounding box diagonal) the parameters were derived for
    pub shape_extent: f64,
}

/// Entity to be meshed, as seen by the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshEntity {
    pub id: EntityId,
    /// Bounding box diagonal
    pub extent: f64,
}

impl MeshEntity {
    pub fn new(id: EntityId, extent: f64) -> Self {
        Self { id, extent }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshQuality {
    VeryCoarse,
    Coarse,
    Normal,
    Precise,
    VeryPrecise,
    UserDefined,
}

impl MeshQuality {
    pub const ALL: [MeshQuality; 6] = [
        MeshQuality::VeryCoarse,
        MeshQuality::Coarse,
        MeshQuality::Normal,
        MeshQuality::Precise,
        MeshQuality::VeryPrecise,
        MeshQuality::UserDefined,
    ];

    /// Stable value stored in settings
    pub fn value(&self) -> i64 {
        match self {
            MeshQuality::VeryCoarse => 0,
            MeshQuality::Coarse => 1,
            MeshQuality::Normal => 2,
            MeshQuality::Precise => 3,
            MeshQuality::VeryPrecise => 4,
            MeshQuality::UserDefined => 5,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|q| q.value() == value)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshQuality::VeryCoarse => "VeryCoarse",
            MeshQuality::Coarse => "Coarse",
            MeshQuality::Normal => "Normal",
            MeshQuality::Precise => "Precise",
            MeshQuality::VeryPrecise => "VeryPrecise",
            MeshQuality::UserDefined => "UserDefined",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeshQuality::VeryCoarse => "Very coarse",
            MeshQuality::Coarse => "Coarse",
            MeshQuality::Normal => "Normal",
            MeshQuality::Precise => "Precise",
            MeshQuality::VeryPrecise => "Very precise",
            MeshQuality::UserDefined => "User defined",
        }
    }

    /// (chordal, angular) multipliers; None for `UserDefined`
    pub fn coefficients(&self) -> Option<(f64, f64)> {
        match self {
            MeshQuality::VeryCoarse => Some((8.0, 4.0)),
            MeshQuality::Coarse => Some((4.0, 2.0)),
            MeshQuality::Normal => Some((1.0, 1.0)),
            MeshQuality::Precise => Some((0.5, 0.5)),
            MeshQuality::VeryPrecise => Some((0.25, 0.25)),
            MeshQuality::UserDefined => None,
        }
    }

    pub fn enumeration() -> Arc<Enumeration> {
        let e = Self::ALL
            .iter()
            .fold(Enumeration::new(), |e, q| e.with_item(q.value(), q.name(), q.label()));
        Arc::new(e)
    }
}

/// Linear deflection derived from the entity extent
pub fn auto_deflection(extent: f64) -> f64 {
    (extent * 0.001).max(MIN_AUTO_DEFLECTION)
}

/// Per-entity replacement of individual parameter fields.
/// Unset fields, and deflections that are not strictly positive, keep the default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshOverride {
    pub linear_deflection: Option<f64>,
    pub angular_deflection: Option<f64>,
    pub relative: Option<bool>,
}

fn usable_deflection(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl MeshOverride {
    pub fn is_empty(&self) -> bool {
        usable_deflection(self.linear_deflection).is_none()
            && usable_deflection(self.angular_deflection).is_none()
            && self.relative.is_none()
    }

    /// Merge this override over `base`, field by field
    pub fn apply(&self, base: MeshParameters) -> MeshParameters {
        MeshParameters {
            linear_deflection: usable_deflection(self.linear_deflection).unwrap_or(base.linear_deflection),
            angular_deflection: usable_deflection(self.angular_deflection).unwrap_or(base.angular_deflection),
            relative: self.relative.unwrap_or(base.relative),
            shape_extent: base.shape_extent,
        }
    }
}

/// Overrides keyed by stable entity identity
#[derive(Debug, Clone, Default)]
pub struct MeshOverrides {
    by_entity: HashMap<EntityId, MeshOverride>,
}

impl MeshOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: EntityId, value: MeshOverride) {
        self.by_entity.insert(entity, value);
    }

    pub fn get(&self, entity: EntityId) -> Option<&MeshOverride> {
        self.by_entity.get(&entity)
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<MeshOverride> {
        self.by_entity.remove(&entity)
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_entity.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MeshParameters {
        MeshParameters {
            linear_deflection: 0.5,
            angular_deflection: 0.3,
            relative: false,
            shape_extent: 10.0,
        }
    }

    #[test]
    fn test_negative_override_is_ignored() {
        let o = MeshOverride {
            linear_deflection: Some(0.1),
            angular_deflection: Some(-1.0),
            relative: None,
        };
        let merged = o.apply(base());
        assert_eq!(merged.linear_deflection, 0.1);
        assert_eq!(merged.angular_deflection, 0.3);
        assert!(!merged.relative);
    }

    #[test]
    fn test_zero_and_nan_are_not_overrides() {
        let o = MeshOverride {
            linear_deflection: Some(0.0),
            angular_deflection: Some(f64::NAN),
            relative: None,
        };
        assert!(o.is_empty());
        assert_eq!(o.apply(base()), base());
    }

    #[test]
    fn test_quality_values_roundtrip() {
        for q in MeshQuality::ALL {
            assert_eq!(MeshQuality::from_value(q.value()), Some(q));
        }
        assert_eq!(MeshQuality::enumeration().len(), 6);
        assert_eq!(MeshQuality::from_value(42), None);
    }

    #[test]
    fn test_auto_deflection_floor() {
        assert_eq!(auto_deflection(1000.0), 1.0);
        assert_eq!(auto_deflection(0.0), MIN_AUTO_DEFLECTION);
    }
}
