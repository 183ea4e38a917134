//! Mesh file I/O.
//!
//! This module provides functions for loading and saving weighted meshes.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | Polygons plus an `edge` element with `bevel_weight` |
//! | JSON | `.json` | ✓ | ✓ | [`json::MeshDocument`] |
//!
//! # Usage
//!
//! ```no_run
//! use finalbevel::io::{load, save};
//! use finalbevel::mesh::PolyMesh;
//!
//! // Load with automatic format detection
//! let mesh: PolyMesh = load("model.ply").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.json").unwrap();
//! ```

pub mod json;
pub mod ply;

use std::path::Path;

use crate::error::{BevelError, Result};
use crate::mesh::{MeshIndex, PolyMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
    /// JSON mesh document.
    Json,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| BevelError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
        Format::Json => json::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save(mesh, path),
        Format::Json => json::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/model.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.json"), Some(Format::Json));
        assert_eq!(Format::from_path("mesh.obj"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result: Result<PolyMesh> = load("model.stl");
        match result {
            Err(BevelError::UnsupportedFormat { extension }) => assert_eq!(extension, "stl"),
            other => panic!("expected unsupported format, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_save_and_load_both_formats() {
        use crate::mesh::build_weighted;
        use nalgebra::Point3;

        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let mesh: PolyMesh =
            build_weighted(&vertices, &[vec![0, 1, 2]], &[([0, 1], 0.75)]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        for name in ["tri.ply", "tri.json"] {
            let path = dir.path().join(name);
            save(&mesh, &path).unwrap();
            let loaded: PolyMesh = load(&path).unwrap();
            assert_eq!(loaded.num_faces(), 1);
            let weights: Vec<f64> = loaded.weighted_edges().map(|(_, w)| w).collect();
            assert_eq!(weights, vec![0.75], "{}", name);
        }
    }
}
