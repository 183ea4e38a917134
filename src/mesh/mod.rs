//! Core mesh data structures.
//!
//! This module provides the polygon mesh the tiered bevel mutates, together
//! with construction helpers.
//!
//! # Overview
//!
//! The primary type is [`PolyMesh`], an ordered list of vertices, edges, and
//! polygonal faces. Edges carry the bevel weight and every element carries a
//! selection flag, mirroring the state a modeling host keeps for its meshes.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use finalbevel::mesh::{build_weighted, PolyMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//! let weights = vec![([0, 1], 1.0)];
//!
//! let mesh: PolyMesh = build_weighted(&vertices, &faces, &weights).unwrap();
//! assert!(mesh.has_weighted_edges());
//! ```

mod builder;
mod index;
mod polymesh;

pub use builder::{
    assign_edge_weights, build_from_polygons, build_from_quads, build_weighted, to_face_vertex,
    to_weighted_edges, WeightedEdge,
};
pub use index::{EdgeId, FaceId, MeshIndex, VertexId};
pub use polymesh::{Edge, Face, PolyMesh, Vertex};
