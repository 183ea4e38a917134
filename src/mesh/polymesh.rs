//! Polygon mesh with per-edge bevel weights and selection state.
//!
//! This is the mutable mesh the tiered bevel works on. Unlike a half-edge
//! structure it keeps explicit edge records, because edges are the carriers
//! of the algorithm's state: every edge has a bevel weight and a selection
//! flag, and the host bevel primitive consumes "the selected edges".
//!
//! # Structure
//!
//! - Vertices, edges, and faces live in ordered arrays addressed by typed ids
//! - Each face stores its vertex loop and the matching edge loop
//! - Vertex-to-edge and edge-to-face adjacency is maintained incrementally as
//!   elements are added, so adjacency queries never rescan the mesh
//!
//! Accessors index directly into storage. Passing an id that is out of range
//! is a caller bug and panics, the same as slice indexing.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use crate::error::{BevelError, Result};

/// A vertex of the polygon mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex. The tiered bevel never reads it.
    pub position: Point3<f64>,

    /// Selection flag.
    pub selected: bool,
}

impl Vertex {
    /// Create a new unselected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            selected: false,
        }
    }
}

/// An edge of the polygon mesh.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    /// The two endpoints, in creation order.
    pub vertices: [VertexId<I>; 2],

    /// Bevel weight. Never negative; `0.0` means the edge belongs to no tier.
    pub bevel_weight: f64,

    /// Selection flag.
    pub selected: bool,
}

impl<I: MeshIndex> Edge<I> {
    /// Check whether `v` is one of the endpoints.
    #[inline]
    pub fn has_vertex(&self, v: VertexId<I>) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }

    /// The endpoint opposite to `v`.
    ///
    /// Returns the first endpoint if `v` is not on the edge.
    #[inline]
    pub fn other(&self, v: VertexId<I>) -> VertexId<I> {
        if self.vertices[0] == v {
            self.vertices[1]
        } else {
            self.vertices[0]
        }
    }
}

/// A polygonal face.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    /// Corner vertices in winding order.
    pub vertices: Vec<VertexId<I>>,

    /// `edges[k]` joins `vertices[k]` and `vertices[k + 1]` (wrapping).
    pub edges: Vec<EdgeId<I>>,

    /// Selection flag.
    pub selected: bool,
}

/// A polygon mesh carrying bevel weights.
#[derive(Debug, Clone)]
pub struct PolyMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) faces: Vec<Face<I>>,

    /// Edges incident to each vertex.
    vertex_edges: Vec<Vec<EdgeId<I>>>,

    /// Faces bordering each edge.
    edge_faces: Vec<Vec<FaceId<I>>>,

    /// Undirected (min, max) vertex pair to edge.
    edge_lookup: HashMap<(usize, usize), EdgeId<I>>,
}

impl<I: MeshIndex> Default for PolyMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<I: MeshIndex> PolyMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            vertex_edges: Vec::new(),
            edge_faces: Vec::new(),
            edge_lookup: HashMap::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Quad-dominant meshes have roughly two edges per face
        let num_edges = num_faces * 2 + num_vertices / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            faces: Vec::with_capacity(num_faces),
            vertex_edges: Vec::with_capacity(num_vertices),
            edge_faces: Vec::with_capacity(num_edges),
            edge_lookup: HashMap::with_capacity(num_edges),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    // ==================== Bevel weights ====================

    /// Get the bevel weight of an edge.
    #[inline]
    pub fn edge_weight(&self, e: EdgeId<I>) -> f64 {
        self.edge(e).bevel_weight
    }

    /// Set the bevel weight of an edge.
    ///
    /// # Panics
    /// Panics if `e` is out of range. Debug builds also reject negative or
    /// non-finite weights.
    #[inline]
    pub fn set_edge_weight(&mut self, e: EdgeId<I>, weight: f64) {
        debug_assert!(
            weight.is_finite() && weight >= 0.0,
            "bevel weight must be finite and non-negative, got {}",
            weight
        );
        self.edges[e.index()].bevel_weight = weight;
    }

    /// Iterate over edges with a non-zero weight.
    pub fn weighted_edges(&self) -> impl Iterator<Item = (EdgeId<I>, f64)> + '_ {
        self.edges()
            .filter(|(_, e)| e.bevel_weight != 0.0)
            .map(|(id, e)| (id, e.bevel_weight))
    }

    /// Check whether any edge carries a weight.
    pub fn has_weighted_edges(&self) -> bool {
        self.edges.iter().any(|e| e.bevel_weight != 0.0)
    }

    // ==================== Selection ====================

    /// Select or deselect a vertex.
    #[inline]
    pub fn select_vertex(&mut self, v: VertexId<I>, selected: bool) {
        self.vertices[v.index()].selected = selected;
    }

    /// Select or deselect an edge.
    #[inline]
    pub fn select_edge(&mut self, e: EdgeId<I>, selected: bool) {
        self.edges[e.index()].selected = selected;
    }

    /// Select or deselect a face.
    #[inline]
    pub fn select_face(&mut self, f: FaceId<I>, selected: bool) {
        self.faces[f.index()].selected = selected;
    }

    /// Check whether a vertex is selected.
    #[inline]
    pub fn is_vertex_selected(&self, v: VertexId<I>) -> bool {
        self.vertex(v).selected
    }

    /// Check whether an edge is selected.
    #[inline]
    pub fn is_edge_selected(&self, e: EdgeId<I>) -> bool {
        self.edge(e).selected
    }

    /// Check whether a face is selected.
    #[inline]
    pub fn is_face_selected(&self, f: FaceId<I>) -> bool {
        self.face(f).selected
    }

    /// Deselect every vertex, edge, and face.
    pub fn clear_selection(&mut self) {
        for v in &mut self.vertices {
            v.selected = false;
        }
        for e in &mut self.edges {
            e.selected = false;
        }
        for f in &mut self.faces {
            f.selected = false;
        }
    }

    /// Iterate over selected vertex IDs.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices()
            .filter(|(_, v)| v.selected)
            .map(|(id, _)| id)
    }

    /// Iterate over selected edge IDs.
    pub fn selected_edges(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.edges().filter(|(_, e)| e.selected).map(|(id, _)| id)
    }

    /// Iterate over selected face IDs.
    pub fn selected_faces(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().filter(|(_, f)| f.selected).map(|(id, _)| id)
    }

    /// Check whether nothing at all is selected.
    pub fn selection_is_empty(&self) -> bool {
        !self.vertices.iter().any(|v| v.selected)
            && !self.edges.iter().any(|e| e.selected)
            && !self.faces.iter().any(|f| f.selected)
    }

    // ==================== Topology Queries ====================

    /// The two endpoints of an edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> (VertexId<I>, VertexId<I>) {
        let [a, b] = self.edge(e).vertices;
        (a, b)
    }

    /// Find the edge joining two vertices.
    pub fn edge_between(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        self.edge_lookup.get(&edge_key(a.index(), b.index())).copied()
    }

    /// Edges joining `a` and `b`, provided both vertices are selected.
    ///
    /// Returns an empty list when either vertex is unselected.
    pub fn edges_between_selected(&self, a: VertexId<I>, b: VertexId<I>) -> Vec<EdgeId<I>> {
        if a == b || !self.is_vertex_selected(a) || !self.is_vertex_selected(b) {
            return Vec::new();
        }
        self.vertex_edges(a)
            .iter()
            .copied()
            .filter(|&e| self.edge(e).has_vertex(b))
            .collect()
    }

    /// Edges incident to a vertex.
    #[inline]
    pub fn vertex_edges(&self, v: VertexId<I>) -> &[EdgeId<I>] {
        &self.vertex_edges[v.index()]
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_edges(v).iter().map(move |&e| self.edge(e).other(v))
    }

    /// Faces bordering an edge.
    #[inline]
    pub fn edge_faces(&self, e: EdgeId<I>) -> &[FaceId<I>] {
        &self.edge_faces[e.index()]
    }

    /// Number of faces bordering an edge.
    #[inline]
    pub fn edge_face_count(&self, e: EdgeId<I>) -> usize {
        self.edge_faces(e).len()
    }

    /// Check whether an edge lies on an open boundary (exactly one face).
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_face_count(e) == 1
    }

    /// Check whether an edge borders exactly two faces.
    #[inline]
    pub fn is_manifold_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_face_count(e) == 2
    }

    /// Check whether an edge is a wire edge (no faces).
    #[inline]
    pub fn is_wire_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_face_count(e) == 0
    }

    /// Check whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| f.vertices.len() == 4)
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        self.vertex_edges.push(Vec::new());
        id
    }

    /// Add an edge between two vertices, or return the existing one.
    ///
    /// # Panics
    /// Panics if either vertex is out of range or `a == b`.
    pub fn add_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> EdgeId<I> {
        assert!(a != b, "edge endpoints must differ: {:?}", a);
        assert!(
            a.index() < self.vertices.len() && b.index() < self.vertices.len(),
            "edge ({:?}, {:?}) references a missing vertex",
            a,
            b
        );

        let key = edge_key(a.index(), b.index());
        if let Some(&existing) = self.edge_lookup.get(&key) {
            return existing;
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge {
            vertices: [a, b],
            bevel_weight: 0.0,
            selected: false,
        });
        self.edge_faces.push(Vec::new());
        self.vertex_edges[a.index()].push(id);
        self.vertex_edges[b.index()].push(id);
        self.edge_lookup.insert(key, id);
        id
    }

    /// Add a polygonal face, creating any edges it needs.
    ///
    /// Edges are created in loop order, so a face appended after existing
    /// geometry only appends new edges.
    pub fn add_face(&mut self, corners: &[VertexId<I>]) -> Result<FaceId<I>> {
        let fi = self.faces.len();
        if corners.len() < 3 {
            return Err(BevelError::DegenerateFace { face: fi });
        }
        for &v in corners {
            if v.index() >= self.vertices.len() {
                return Err(BevelError::InvalidVertexIndex {
                    face: fi,
                    vertex: v.index(),
                });
            }
        }
        for (k, &v) in corners.iter().enumerate() {
            if corners[k + 1..].contains(&v) {
                return Err(BevelError::DegenerateFace { face: fi });
            }
        }

        let id = FaceId::new(fi);
        let n = corners.len();
        let mut edges = Vec::with_capacity(n);
        for k in 0..n {
            let e = self.add_edge(corners[k], corners[(k + 1) % n]);
            self.edge_faces[e.index()].push(id);
            edges.push(e);
        }

        self.faces.push(Face {
            vertices: corners.to_vec(),
            edges,
            selected: false,
        });
        Ok(id)
    }

    // ==================== Validation ====================

    /// Check that adjacency tables agree with the element arrays.
    pub fn is_valid(&self) -> bool {
        if self.vertex_edges.len() != self.vertices.len()
            || self.edge_faces.len() != self.edges.len()
            || self.edge_lookup.len() != self.edges.len()
        {
            return false;
        }

        for (eid, e) in self.edges() {
            let [a, b] = e.vertices;
            if a == b || a.index() >= self.vertices.len() || b.index() >= self.vertices.len() {
                return false;
            }
            if !self.vertex_edges(a).contains(&eid) || !self.vertex_edges(b).contains(&eid) {
                return false;
            }
            if e.bevel_weight.is_nan() || e.bevel_weight < 0.0 {
                return false;
            }
        }

        for (fid, f) in self.faces() {
            if f.vertices.len() != f.edges.len() || f.vertices.len() < 3 {
                return false;
            }
            let n = f.vertices.len();
            for k in 0..n {
                let e = f.edges[k];
                if self.edge_between(f.vertices[k], f.vertices[(k + 1) % n]) != Some(e) {
                    return false;
                }
                if !self.edge_faces(e).contains(&fid) {
                    return false;
                }
            }
        }

        true
    }
}
