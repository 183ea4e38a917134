//! Mesh construction utilities.
//!
//! This module builds [`PolyMesh`] values from face-vertex lists, as found in
//! mesh file formats, and attaches bevel weights to the resulting edges.

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::polymesh::PolyMesh;
use crate::error::{BevelError, Result};

/// A bevel weight attached to the edge between two vertex indices.
pub type WeightedEdge = ([usize; 2], f64);

/// Build a polygon mesh from vertices and polygon faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each an ordered list of at least three vertex indices
///
/// # Returns
/// A polygon mesh whose edges are numbered in face order, or an error if the
/// input is invalid.
///
/// # Example
/// ```
/// use finalbevel::mesh::{build_from_polygons, PolyMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: PolyMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_edges(), 4);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<PolyMesh<I>> {
    if faces.is_empty() {
        return Err(BevelError::EmptyMesh);
    }

    // Validate before allocating anything
    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(BevelError::DegenerateFace { face: fi });
        }
        for &vi in face {
            if vi >= vertices.len() {
                return Err(BevelError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
    }

    let mut mesh = PolyMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    for face in faces {
        let corners: Vec<VertexId<I>> = face.iter().map(|&vi| VertexId::new(vi)).collect();
        mesh.add_face(&corners)?;
    }

    Ok(mesh)
}

/// Build a polygon mesh from vertices and quad faces.
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<PolyMesh<I>> {
    let polygons: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &polygons)
}

/// Attach bevel weights to existing edges.
///
/// Every pair must name an edge of the mesh; weights must be finite and
/// non-negative.
pub fn assign_edge_weights<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    weights: &[WeightedEdge],
) -> Result<()> {
    for &([a, b], weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(BevelError::NegativeWeight { v0: a, v1: b, weight });
        }
        if a >= mesh.num_vertices() || b >= mesh.num_vertices() {
            return Err(BevelError::MissingEdge { v0: a, v1: b });
        }
        let e = mesh
            .edge_between(VertexId::new(a), VertexId::new(b))
            .ok_or(BevelError::MissingEdge { v0: a, v1: b })?;
        mesh.set_edge_weight(e, weight);
    }
    Ok(())
}

/// Build a polygon mesh and attach bevel weights in one step.
pub fn build_weighted<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
    weights: &[WeightedEdge],
) -> Result<PolyMesh<I>> {
    let mut mesh = build_from_polygons(vertices, faces)?;
    assign_edge_weights(&mut mesh, weights)?;
    Ok(mesh)
}

/// Convert a polygon mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &PolyMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .faces()
        .map(|(_, f)| f.vertices.iter().map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

/// List every weighted edge as a vertex pair.
pub fn to_weighted_edges<I: MeshIndex>(mesh: &PolyMesh<I>) -> Vec<WeightedEdge> {
    mesh.weighted_edges()
        .map(|(e, w)| {
            let (a, b) = mesh.edge_vertices(e);
            ([a.index(), b.index()], w)
        })
        .collect()
}
