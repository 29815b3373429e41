// Tessellation parameters of geometric entities
// The tessellation algorithm itself is provided by the geometry kernel (`Mesher`)

pub mod params;
pub mod resolver;
pub mod settings;

pub use params::{MeshEntity, MeshOverride, MeshOverrides, MeshParameters, MeshQuality};
pub use resolver::{compute_meshes, MeshError, MeshOutcome, MeshParametersResolver, MeshReport, Mesher};
pub use settings::{meshing_group, MeshDefaults};
