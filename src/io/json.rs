//! JSON mesh documents.
//!
//! A small interchange format for handing weighted meshes to and from a
//! host over a pipe or message queue:
//!
//! ```json
//! {
//!   "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
//!   "faces": [[0, 1, 2, 3]],
//!   "edges": [{ "vertices": [0, 1], "bevel_weight": 1.0 }]
//! }
//! ```
//!
//! Only weighted edges need to be listed; face edges are implied.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{BevelError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, MeshIndex, PolyMesh, VertexId};

/// One edge record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Endpoint vertex indices.
    pub vertices: [usize; 2],
    /// Bevel weight.
    #[serde(default)]
    pub bevel_weight: f64,
}

/// Serialized form of a [`PolyMesh`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Polygon faces as vertex index loops.
    pub faces: Vec<Vec<usize>>,
    /// Weighted and loose edges.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl MeshDocument {
    /// Capture a mesh. Face edges without weight are left implicit.
    pub fn from_mesh<I: MeshIndex>(mesh: &PolyMesh<I>) -> Self {
        let (vertices, faces) = to_face_vertex(mesh);
        let edges = mesh
            .edges()
            .filter(|(id, e)| e.bevel_weight != 0.0 || mesh.is_wire_edge(*id))
            .map(|(_, e)| EdgeRecord {
                vertices: [e.vertices[0].index(), e.vertices[1].index()],
                bevel_weight: e.bevel_weight,
            })
            .collect();

        Self {
            vertices: vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            faces,
            edges,
        }
    }

    /// Build the mesh this document describes.
    pub fn to_mesh<I: MeshIndex>(&self) -> Result<PolyMesh<I>> {
        let positions: Vec<Point3<f64>> = self
            .vertices
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        let mut mesh: PolyMesh<I> = build_from_polygons(&positions, &self.faces)?;

        for record in &self.edges {
            let [a, b] = record.vertices;
            if a >= positions.len() || b >= positions.len() || a == b {
                return Err(BevelError::MissingEdge { v0: a, v1: b });
            }
            if !record.bevel_weight.is_finite() || record.bevel_weight < 0.0 {
                return Err(BevelError::NegativeWeight {
                    v0: a,
                    v1: b,
                    weight: record.bevel_weight,
                });
            }
            let e = mesh.add_edge(VertexId::new(a), VertexId::new(b));
            mesh.set_edge_weight(e, record.bevel_weight);
        }

        Ok(mesh)
    }
}

/// Load a mesh from a JSON document.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        BevelError::LoadError { message, .. } => BevelError::LoadError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Read a mesh document from any reader.
pub fn read<R: Read, I: MeshIndex>(reader: R) -> Result<PolyMesh<I>> {
    let doc: MeshDocument = serde_json::from_reader(reader).map_err(|e| BevelError::LoadError {
        path: Default::default(),
        message: e.to_string(),
    })?;
    doc.to_mesh()
}

/// Save a mesh as a pretty-printed JSON document.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &MeshDocument::from_mesh(mesh)).map_err(|e| {
        BevelError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    writer.flush()?;
    Ok(())
}
