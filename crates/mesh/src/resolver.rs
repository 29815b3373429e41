//! Mesh parameter resolution.
//!
//! `MeshParametersResolver` is a pure function of (meshing defaults,
//! overrides, entity): it holds a snapshot of the defaults and a shared
//! borrow of the overrides, so it can be used from worker threads while the
//! settings tree stays untouched.
//!
//! Batch operations check the cancellation token between entities, never in
//! the middle of one, and report one outcome per processed entity.

use partview_config::Settings;
use partview_core::{EntityId, TaskProgress};
use thiserror::Error;

use crate::params::{MeshEntity, MeshOverrides, MeshParameters};
use crate::settings::MeshDefaults;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("meshing cancelled")]
    Cancelled,
    #[error("meshing of entity {entity} failed: {message}")]
    Mesher { entity: EntityId, message: String },
}

/// Tessellation backend (geometry kernel)
pub trait Mesher {
    fn mesh(&self, entity: &MeshEntity, params: &MeshParameters) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy)]
pub struct MeshParametersResolver<'a> {
    defaults: MeshDefaults,
    overrides: &'a MeshOverrides,
}

impl<'a> MeshParametersResolver<'a> {
    pub fn new(defaults: MeshDefaults, overrides: &'a MeshOverrides) -> Self {
        Self { defaults, overrides }
    }

    pub fn from_settings(settings: &Settings, overrides: &'a MeshOverrides) -> Self {
        Self::new(MeshDefaults::from_settings(settings), overrides)
    }

    pub fn defaults(&self) -> &MeshDefaults {
        &self.defaults
    }

    /// Defaults for the entity extent, then its override merged field by field
    pub fn resolve(&self, entity: &MeshEntity) -> MeshParameters {
        let base = self.defaults.parameters_for(entity.extent);
        match self.overrides.get(entity.id) {
            Some(o) => o.apply(base),
            None => base,
        }
    }

    /// Resolve several entities, stopping early if `progress` is cancelled
    pub fn resolve_all(
        &self,
        entities: &[MeshEntity],
        progress: Option<&TaskProgress>,
    ) -> Result<Vec<(EntityId, MeshParameters)>, MeshError> {
        let mut out = Vec::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if progress.map_or(false, |p| p.is_cancelled()) {
                return Err(MeshError::Cancelled);
            }
            out.push((entity.id, self.resolve(entity)));
            if let Some(p) = progress {
                p.set_ratio(i + 1, entities.len());
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshOutcome {
    pub entity: EntityId,
    pub result: Result<MeshParameters, MeshError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// One outcome per entity processed before completion or cancellation
    pub outcomes: Vec<MeshOutcome>,
    pub cancelled: bool,
}

impl MeshReport {
    pub fn failures(&self) -> impl Iterator<Item = &MeshOutcome> + '_ {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Mesh every entity with its resolved parameters.
///
/// A failing entity is reported and the batch continues. On cancellation the
/// report holds the entities processed so far and `cancelled` is set.
pub fn compute_meshes(
    resolver: &MeshParametersResolver<'_>,
    entities: &[MeshEntity],
    mesher: &dyn Mesher,
    progress: Option<&TaskProgress>,
) -> MeshReport {
    let mut report = MeshReport::default();
    for (i, entity) in entities.iter().enumerate() {
        if progress.map_or(false, |p| p.is_cancelled()) {
            log::debug!("Meshing cancelled after {} of {} entities", i, entities.len());
            report.cancelled = true;
            break;
        }
        let params = resolver.resolve(entity);
        let result = match mesher.mesh(entity, &params) {
            Ok(()) => Ok(params),
            Err(message) => {
                log::warn!("Meshing of entity {} failed: {}", entity.id, message);
                Err(MeshError::Mesher {
                    entity: entity.id,
                    message,
                })
            }
        };
        report.outcomes.push(MeshOutcome {
            entity: entity.id,
            result,
        });
        if let Some(p) = progress {
            p.set_ratio(i + 1, entities.len());
        }
    }
    report
}
