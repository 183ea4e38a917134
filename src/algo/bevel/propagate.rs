//! Carrying the next tier's weight across a fresh bevel strip.
//!
//! When a lower-tier edge loop crosses a higher-tier edge, bevelling the
//! higher tier cuts the loop: the strip's cross edges between the two
//! halves come out unweighted. Left alone, the next tier would bevel the
//! two halves separately and leave a notch where they meet the strip.
//!
//! The resolver finds the cut and bridges it:
//!
//! 1. Every vertex records the highest weight among its edges that are at
//!    least the current tier (the *scratch* weight).
//! 2. Endpoints of next-tier edges with a higher scratch weight touch the
//!    strip; they are the seeds.
//! 3. From each seed, a walk crosses the strip along zero-weight edges for
//!    at most `segments - 1` steps.
//! 4. Zero-weight edges between two visited vertices are candidates; walking
//!    each path again assigns the next tier's weight to them, plus one
//!    bridging hop from the end of the path to the seed on the far side.
//!
//! Weights are only ever raised from zero.

use std::collections::{BTreeSet, HashSet};

use log::{debug, trace};

use super::host::BevelDelta;
use super::options::{BevelOptions, WalkStrategy};
use crate::error::Result;
use crate::mesh::{EdgeId, MeshIndex, PolyMesh, VertexId};

/// Per-vertex maximum weight, kept apart from the mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationScratch {
    weights: Vec<f64>,
}

impl PropagationScratch {
    /// Scratch space for `num_vertices` vertices, all zero.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            weights: vec![0.0; num_vertices],
        }
    }

    /// Compute scratch weights from every edge weighted at least `current`.
    pub fn from_mesh<I: MeshIndex>(mesh: &PolyMesh<I>, current: f64, options: &BevelOptions) -> Self {
        let mut scratch = Self::new(mesh.num_vertices());
        for (e, w) in mesh.weighted_edges() {
            if w >= current || options.weights_match(w, current) {
                let (a, b) = mesh.edge_vertices(e);
                scratch.raise(a, w);
                scratch.raise(b, w);
            }
        }
        scratch
    }

    /// Scratch weight of `v`.
    #[inline]
    pub fn get<I: MeshIndex>(&self, v: VertexId<I>) -> f64 {
        self.weights.get(v.index()).copied().unwrap_or(0.0)
    }

    /// Overwrite the scratch weight of `v`.
    #[inline]
    pub fn set<I: MeshIndex>(&mut self, v: VertexId<I>, weight: f64) {
        if let Some(slot) = self.weights.get_mut(v.index()) {
            *slot = weight;
        }
    }

    /// Raise the scratch weight of `v` to at least `weight`.
    #[inline]
    pub fn raise<I: MeshIndex>(&mut self, v: VertexId<I>, weight: f64) {
        if let Some(slot) = self.weights.get_mut(v.index()) {
            if weight > *slot {
                *slot = weight;
            }
        }
    }
}

/// What the resolver found and changed.
#[derive(Debug, Clone)]
pub struct PropagationOutcome<I: MeshIndex = u32> {
    /// Vertices where the next tier meets the strip, ascending.
    pub seeds: Vec<VertexId<I>>,
    /// The walk from each seed, seed first.
    pub paths: Vec<Vec<VertexId<I>>>,
    /// Zero-weight edges with both endpoints on some path.
    pub candidate_edges: usize,
    /// Edges that received the next tier's weight.
    pub propagated: Vec<EdgeId<I>>,
}

impl<I: MeshIndex> Default for PropagationOutcome<I> {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            paths: Vec::new(),
            candidate_edges: 0,
            propagated: Vec::new(),
        }
    }
}

/// Find the seeds for a transition from `current` to `next`.
pub fn find_seeds<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    scratch: &PropagationScratch,
    next: f64,
    options: &BevelOptions,
) -> Vec<VertexId<I>> {
    let mut seeds = BTreeSet::new();
    for (e, w) in mesh.weighted_edges() {
        if !options.weights_match(w, next) {
            continue;
        }
        let (a, b) = mesh.edge_vertices(e);
        for v in [a, b] {
            if scratch.get(v) > next {
                seeds.insert(v);
            }
        }
    }
    seeds.into_iter().collect()
}

/// Propagate weight `next` across the strip left by bevelling `current`.
///
/// `segments` is the segment count the `current` tier was bevelled with.
/// Selection is used as the visited set and is empty on return.
pub fn propagate_weights<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    delta: &BevelDelta<I>,
    options: &BevelOptions,
    current: f64,
    next: f64,
    segments: u32,
) -> Result<PropagationOutcome<I>> {
    mesh.clear_selection();

    let scratch = PropagationScratch::from_mesh(mesh, current, options);
    let seeds = find_seeds(mesh, &scratch, next, options);
    if seeds.is_empty() {
        trace!("No seeds between {} and {}", current, next);
        return Ok(PropagationOutcome::default());
    }
    for &v in &seeds {
        mesh.select_vertex(v, true);
    }

    let steps = segments.saturating_sub(1) as usize;
    let mut paths = Vec::with_capacity(seeds.len());
    for &seed in &seeds {
        let path = match walk(mesh, delta, options.walk, seed, steps) {
            Ok(path) => path,
            Err(err) => {
                mesh.clear_selection();
                return Err(err);
            }
        };
        paths.push(path);
    }

    let candidates: HashSet<EdgeId<I>> = mesh
        .edges()
        .filter(|(_, e)| {
            e.bevel_weight == 0.0
                && mesh.is_vertex_selected(e.vertices[0])
                && mesh.is_vertex_selected(e.vertices[1])
        })
        .map(|(id, _)| id)
        .collect();

    let mut outcome = PropagationOutcome {
        seeds,
        paths,
        candidate_edges: candidates.len(),
        propagated: Vec::new(),
    };
    if candidates.is_empty() {
        mesh.clear_selection();
        debug!("Seeds found but no strip to cross between {} and {}", current, next);
        return Ok(outcome);
    }

    let window_limit = segments as usize + 3;
    for path in &outcome.paths {
        let seed = path[0];
        // Already consumed by an earlier window
        if !mesh.is_vertex_selected(seed) {
            continue;
        }

        let mut window = vec![seed];
        let mut cursor = seed;
        for &v in &path[1..] {
            for e in mesh.edges_between_selected(cursor, v) {
                if candidates.contains(&e) && mesh.edge_weight(e) == 0.0 {
                    mesh.set_edge_weight(e, next);
                    outcome.propagated.push(e);
                }
            }
            cursor = v;
            window.push(v);
        }

        // The hop lands on the seed across the strip, never on a
        // neighboring crossing's walk.
        let origin = delta.origin(seed);
        let bridge = mesh
            .vertex_edges(cursor)
            .iter()
            .copied()
            .filter(|e| candidates.contains(e) && mesh.edge_weight(*e) == 0.0)
            .map(|e| (e, mesh.edge(e).other(cursor)))
            .filter(|(_, n)| {
                mesh.is_vertex_selected(*n)
                    && !window.contains(n)
                    && outcome.seeds.binary_search(n).is_ok()
                    && (options.walk == WalkStrategy::IndexOrder || delta.origin(*n) == origin)
            })
            .min_by_key(|(_, n)| *n);
        if let Some((e, n)) = bridge {
            mesh.set_edge_weight(e, next);
            outcome.propagated.push(e);
            window.push(n);
        }

        debug_assert!(window.len() <= window_limit);
        for v in window {
            mesh.select_vertex(v, false);
        }
    }

    mesh.clear_selection();
    debug!(
        "Propagated weight {} onto {} edge(s) from {} seed(s)",
        next,
        outcome.propagated.len(),
        outcome.seeds.len()
    );
    Ok(outcome)
}

/// Walk from `seed` across the strip, selecting each vertex reached.
fn walk<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    delta: &BevelDelta<I>,
    strategy: WalkStrategy,
    seed: VertexId<I>,
    steps: usize,
) -> Result<Vec<VertexId<I>>> {
    let mut path = vec![seed];
    let mut cursor = seed;
    for _ in 0..steps {
        let step = match strategy {
            WalkStrategy::Provenance => provenance_step(mesh, delta, seed, cursor),
            WalkStrategy::IndexOrder => index_step(mesh, cursor)?,
        };
        match step {
            Some(v) => {
                mesh.select_vertex(v, true);
                path.push(v);
                cursor = v;
            }
            None => break,
        }
    }
    Ok(path)
}

/// Lowest unselected neighbor over a zero-weight edge that was split from
/// the same vertex as the seed.
fn provenance_step<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    delta: &BevelDelta<I>,
    seed: VertexId<I>,
    cursor: VertexId<I>,
) -> Option<VertexId<I>> {
    let origin = delta.origin(seed);
    mesh.vertex_edges(cursor)
        .iter()
        .filter(|&&e| mesh.edge_weight(e) == 0.0)
        .map(|&e| mesh.edge(e).other(cursor))
        .filter(|&n| !mesh.is_vertex_selected(n) && delta.origin(n) == origin)
        .min()
}

/// Probe the vertex after `cursor`, then the one before it.
fn index_step<I: MeshIndex>(mesh: &PolyMesh<I>, cursor: VertexId<I>) -> Result<Option<VertexId<I>>> {
    for delta in [1, -1] {
        let n = cursor.offset(delta, mesh.num_vertices())?;
        if mesh.is_vertex_selected(n) {
            continue;
        }
        let joined = mesh
            .edge_between(cursor, n)
            .map_or(false, |e| mesh.edge_weight(e) == 0.0);
        if joined {
            return Ok(Some(n));
        }
    }
    Ok(None)
}
