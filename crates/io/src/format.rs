// Supported file formats

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Step,
    Iges,
    Brep,
    Stl,
    Obj,
    Gltf,
    Vrml,
    Ply,
    Off,
    Amf,
    Dxf,
    Image,
}

impl Format {
    pub const ALL: [Format; 12] = [
        Format::Step,
        Format::Iges,
        Format::Brep,
        Format::Stl,
        Format::Obj,
        Format::Gltf,
        Format::Vrml,
        Format::Ply,
        Format::Off,
        Format::Amf,
        Format::Dxf,
        Format::Image,
    ];

    /// Stable identifier, used as settings key segment
    pub fn id(&self) -> &'static str {
        match self {
            Format::Step => "step",
            Format::Iges => "iges",
            Format::Brep => "brep",
            Format::Stl => "stl",
            Format::Obj => "obj",
            Format::Gltf => "gltf",
            Format::Vrml => "vrml",
            Format::Ply => "ply",
            Format::Off => "off",
            Format::Amf => "amf",
            Format::Dxf => "dxf",
            Format::Image => "image",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Step => "STEP",
            Format::Iges => "IGES",
            Format::Brep => "OpenCascade BREP",
            Format::Stl => "STL",
            Format::Obj => "Wavefront OBJ",
            Format::Gltf => "glTF",
            Format::Vrml => "VRML",
            Format::Ply => "PLY",
            Format::Off => "OFF",
            Format::Amf => "AMF",
            Format::Dxf => "DXF",
            Format::Image => "Image",
        }
    }

    /// File suffixes, lowercase, without dot
    pub fn file_suffixes(&self) -> &'static [&'static str] {
        match self {
            Format::Step => &["step", "stp"],
            Format::Iges => &["iges", "igs"],
            Format::Brep => &["brep", "rle", "occ"],
            Format::Stl => &["stl"],
            Format::Obj => &["obj"],
            Format::Gltf => &["gltf", "glb"],
            Format::Vrml => &["wrl", "wrz", "vrml"],
            Format::Ply => &["ply"],
            Format::Off => &["off"],
            Format::Amf => &["amf"],
            Format::Dxf => &["dxf"],
            Format::Image => &["png", "jpg", "jpeg", "bmp", "tiff"],
        }
    }

    pub fn from_id(id: &str) -> Option<Format> {
        Self::ALL.iter().copied().find(|f| f.id() == id)
    }

    /// Guess the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.file_suffixes().contains(&ext.as_str()))
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path(Path::new("/parts/bracket.STP")), Some(Format::Step));
        assert_eq!(Format::from_path(Path::new("scene.glb")), Some(Format::Gltf));
        assert_eq!(Format::from_path(Path::new("notes.txt")), None);
        assert_eq!(Format::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_ids_are_unique_and_reversible() {
        for format in Format::ALL {
            assert_eq!(Format::from_id(format.id()), Some(format));
        }
        assert_eq!(Format::from_id("dwg"), None);
    }
}
