//! The seam between the tiered bevel and whatever actually bevels edges.
//!
//! Cutting the geometry of a multi-segment bevel is the job of a host
//! (a modeling kernel, a DCC plugin, a test script). The tiered algorithm
//! only needs three primitives from it:
//!
//! - [`BevelHost::bevel`]: bevel the currently selected edges
//! - [`BevelHost::select_non_manifold_edges`]: select edges that are not manifold
//! - [`BevelHost::region_to_loop`]: turn a face selection into its boundary loop
//!
//! The last two have topological default implementations on [`PolyMesh`], so
//! most hosts only provide `bevel`. Any closure with the right signature is a
//! host as well.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::options::ManifoldRule;
use crate::error::Result;
use crate::mesh::{EdgeId, FaceId, MeshIndex, PolyMesh, VertexId};

/// How outer miters are shaped where bevelled edges meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiterOuter {
    /// Plain sharp corner.
    Sharp,
    /// Patch the corner with an extra face.
    Patch,
    /// Round the corner with an arc.
    #[default]
    Arc,
}

/// Parameters for a single bevel invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelParams {
    /// Offset distance in mesh units.
    pub offset: f64,
    /// Number of segments across the bevel.
    pub segments: u32,
    /// Profile shape (0.5 is round).
    pub profile: f64,
    /// Clamp offsets so adjacent bevels don't overlap.
    pub clamp_overlap: bool,
    /// Outer miter shape.
    pub miter_outer: MiterOuter,
}

/// What a bevel added to the mesh.
///
/// Ids refer to the mesh as it is right after the bevel. `vertex_sources`
/// maps every vertex produced by splitting an original vertex back to that
/// vertex; a vertex reused in place maps to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BevelDelta<I: MeshIndex = u32> {
    /// Vertices added by the bevel.
    pub new_vertices: Vec<VertexId<I>>,
    /// Edges added by the bevel.
    pub new_edges: Vec<EdgeId<I>>,
    /// Faces added by the bevel (the bevel strips).
    pub new_faces: Vec<FaceId<I>>,
    /// Profile vertex → the vertex it was split from.
    pub vertex_sources: HashMap<VertexId<I>, VertexId<I>>,
}

impl<I: MeshIndex> Default for BevelDelta<I> {
    fn default() -> Self {
        Self {
            new_vertices: Vec::new(),
            new_edges: Vec::new(),
            new_faces: Vec::new(),
            vertex_sources: HashMap::new(),
        }
    }
}

impl<I: MeshIndex> BevelDelta<I> {
    /// The vertex `v` was split from, if the bevel reported one.
    #[inline]
    pub fn source_of(&self, v: VertexId<I>) -> Option<VertexId<I>> {
        self.vertex_sources.get(&v).copied()
    }

    /// Source of `v`, falling back to `v` itself for untouched vertices.
    #[inline]
    pub fn origin(&self, v: VertexId<I>) -> VertexId<I> {
        self.source_of(v).unwrap_or(v)
    }

    /// Check whether the bevel added nothing.
    pub fn is_empty(&self) -> bool {
        self.new_vertices.is_empty() && self.new_edges.is_empty() && self.new_faces.is_empty()
    }
}

/// The primitives the tiered bevel needs from its environment.
pub trait BevelHost<I: MeshIndex = u32> {
    /// Bevel the selected edges of `mesh` and report what was added.
    ///
    /// After this call the mesh may have a completely different layout;
    /// only the returned delta describes it.
    fn bevel(&mut self, mesh: &mut PolyMesh<I>, params: &BevelParams) -> Result<BevelDelta<I>>;

    /// Select the edges `rule` considers non-manifold. Returns how many
    /// edges were selected.
    fn select_non_manifold_edges(&mut self, mesh: &mut PolyMesh<I>, rule: ManifoldRule) -> usize {
        select_non_manifold(mesh, rule)
    }

    /// Replace the face selection by the edges on its boundary. Returns
    /// the number of loop edges selected.
    fn region_to_loop(&mut self, mesh: &mut PolyMesh<I>) -> usize {
        region_to_loop(mesh)
    }
}

impl<I, F> BevelHost<I> for F
where
    I: MeshIndex,
    F: FnMut(&mut PolyMesh<I>, &BevelParams) -> Result<BevelDelta<I>>,
{
    fn bevel(&mut self, mesh: &mut PolyMesh<I>, params: &BevelParams) -> Result<BevelDelta<I>> {
        self(mesh, params)
    }
}

/// Select every edge that is not manifold under `rule`, with its endpoints.
pub fn select_non_manifold<I: MeshIndex>(mesh: &mut PolyMesh<I>, rule: ManifoldRule) -> usize {
    let picked: Vec<EdgeId<I>> = mesh
        .edge_ids()
        .filter(|&e| !rule.is_manifold(mesh.edge_face_count(e)))
        .collect();

    for &e in &picked {
        select_edge_flush(mesh, e);
    }
    picked.len()
}

/// Turn the selected faces into their boundary edge loop.
///
/// An edge is on the loop when exactly one of its faces is selected, which
/// includes open mesh boundaries of the region. Afterwards only the loop
/// edges and their vertices are selected.
pub fn region_to_loop<I: MeshIndex>(mesh: &mut PolyMesh<I>) -> usize {
    let loop_edges: Vec<EdgeId<I>> = mesh
        .edge_ids()
        .filter(|&e| {
            mesh.edge_faces(e)
                .iter()
                .filter(|&&f| mesh.is_face_selected(f))
                .count()
                == 1
        })
        .collect();

    mesh.clear_selection();
    for &e in &loop_edges {
        select_edge_flush(mesh, e);
    }
    loop_edges.len()
}

/// Select an edge along with both endpoints.
pub(crate) fn select_edge_flush<I: MeshIndex>(mesh: &mut PolyMesh<I>, e: EdgeId<I>) {
    let (a, b) = mesh.edge_vertices(e);
    mesh.select_edge(e, true);
    mesh.select_vertex(a, true);
    mesh.select_vertex(b, true);
}
