//! Meshes and scripted hosts shared by the bevel unit tests.

use std::collections::{HashMap, VecDeque};

use nalgebra::Point3;

use super::host::{BevelDelta, BevelHost, BevelParams};
use crate::error::Result;
use crate::mesh::{
    build_from_polygons, build_weighted, EdgeId, FaceId, PolyMesh, VertexId, WeightedEdge,
};

pub(crate) type Step = Box<dyn FnMut(&mut PolyMesh, &BevelParams) -> Result<BevelDelta>>;

/// A host that plays back one scripted bevel per call and records what it
/// was asked to do. Calls past the end of the script change nothing.
#[derive(Default)]
pub(crate) struct ScriptedHost {
    steps: VecDeque<Step>,
    pub calls: Vec<(BevelParams, Vec<[usize; 2]>)>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<F>(mut self, step: F) -> Self
    where
        F: FnMut(&mut PolyMesh, &BevelParams) -> Result<BevelDelta> + 'static,
    {
        self.steps.push_back(Box::new(step));
        self
    }
}

impl BevelHost for ScriptedHost {
    fn bevel(&mut self, mesh: &mut PolyMesh, params: &BevelParams) -> Result<BevelDelta> {
        let mut selected: Vec<[usize; 2]> = mesh
            .selected_edges()
            .map(|e| {
                let (a, b) = mesh.edge_vertices(e);
                [a.index().min(b.index()), a.index().max(b.index())]
            })
            .collect();
        selected.sort_unstable();
        self.calls.push((*params, selected));

        match self.steps.pop_front() {
            Some(mut step) => step(mesh, params),
            None => Ok(BevelDelta::default()),
        }
    }
}

/// Vertex pair → weight, order independent.
pub(crate) fn weight_between(mesh: &PolyMesh, a: usize, b: usize) -> Option<f64> {
    mesh.edge_between(VertexId::new(a), VertexId::new(b))
        .map(|e| mesh.edge_weight(e))
}

/// A single unit quad with every edge at weight 1.0.
pub(crate) fn weighted_quad() -> PolyMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let weights = [([0, 1], 1.0), ([1, 2], 1.0), ([2, 3], 1.0), ([3, 0], 1.0)];
    build_weighted(&vertices, &[vec![0, 1, 2, 3]], &weights).unwrap()
}

/// Bevel all four sides of [`weighted_quad`]: an inset quad surrounded by
/// four strip faces. All weights come out zero.
pub(crate) fn bevel_quad_ring(mesh: &mut PolyMesh, params: &BevelParams) -> Result<BevelDelta> {
    let inset = params.offset.min(0.4);
    let mut vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    vertices.push(Point3::new(inset, inset, 0.0));
    vertices.push(Point3::new(1.0 - inset, inset, 0.0));
    vertices.push(Point3::new(1.0 - inset, 1.0 - inset, 0.0));
    vertices.push(Point3::new(inset, 1.0 - inset, 0.0));

    let faces = vec![
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 0, 4, 7],
    ];
    let rebuilt = build_from_polygons(&vertices, &faces)?;

    let mut delta = BevelDelta {
        new_vertices: (4..8).map(VertexId::new).collect(),
        new_faces: (1..5).map(FaceId::new).collect(),
        ..BevelDelta::default()
    };
    delta.new_edges = rebuilt.edge_ids().collect();
    for k in 0..4 {
        delta
            .vertex_sources
            .insert(VertexId::new(4 + k), VertexId::new(k));
    }

    *mesh = rebuilt;
    Ok(delta)
}

/// A 3x3 vertex grid (2x2 quads), indexed row-major.
///
/// The center column 1-4-7 carries weight 2.0; the row edges 3-4 and 4-5
/// through the center carry 1.0, so the lower tier crosses the higher one
/// at vertex 4.
pub(crate) fn cross_grid() -> PolyMesh {
    column_grid(3, &[1])
}

/// A grid of `rows` vertex rows by three columns, indexed row-major.
///
/// The center column carries weight 2.0 from bottom to top. Each row in
/// `crossings` carries 1.0 on both of its edges through the column.
pub(crate) fn column_grid(rows: usize, crossings: &[usize]) -> PolyMesh {
    let mut vertices = Vec::new();
    for row in 0..rows {
        for col in 0..3 {
            vertices.push(Point3::new(col as f64, row as f64, 0.0));
        }
    }
    let mut faces = Vec::new();
    for r in 0..rows - 1 {
        for c in 0..2 {
            let v = r * 3 + c;
            faces.push(vec![v, v + 1, v + 4, v + 3]);
        }
    }
    let mut weights: Vec<WeightedEdge> = (0..rows - 1)
        .map(|r| ([column_vertex(r), column_vertex(r + 1)], 2.0))
        .collect();
    for &r in crossings {
        weights.push(([r * 3, column_vertex(r)], 1.0));
        weights.push(([column_vertex(r), r * 3 + 2], 1.0));
    }
    build_weighted(&vertices, &faces, &weights).unwrap()
}

/// Center column vertex of grid row `r`.
pub(crate) fn column_vertex(r: usize) -> usize {
    r * 3 + 1
}

/// Where [`bevel_column`] puts the profile vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProfileLayout {
    /// Rail 0 reuses the original column vertex; the rest are appended.
    ReuseOriginal,
    /// Every profile vertex is appended, one row's profile at a time, rows
    /// in the given order.
    Appended([usize; 3]),
    /// Every profile vertex is appended, one rail at a time: rail 0 of
    /// every row, then rail 1, and so on.
    SegmentMajor,
}

/// Bevel the center column of [`cross_grid`] into `segments` strips.
pub(crate) fn bevel_column(
    mesh: &mut PolyMesh,
    segments: u32,
    layout: ProfileLayout,
) -> Result<BevelDelta> {
    bevel_grid_column(mesh, 3, segments, layout)
}

/// Bevel the center column of a [`column_grid`] with `rows` vertex rows.
///
/// Each column vertex becomes a profile of `segments + 1` vertices. The west
/// quads keep rail 0, the east quads move to rail `segments`, and the strip
/// faces fill in between. Weights on untouched edges carry over; every
/// edge the bevel creates starts at zero.
pub(crate) fn bevel_grid_column(
    mesh: &mut PolyMesh,
    rows: usize,
    segments: u32,
    layout: ProfileLayout,
) -> Result<BevelDelta> {
    let s = segments as usize;
    let old = mesh.clone();

    let mut out: PolyMesh = PolyMesh::new();
    for v in old.vertex_ids() {
        out.add_vertex(*old.position(v));
    }

    let slots: Vec<(usize, usize)> = match layout {
        ProfileLayout::ReuseOriginal => (0..rows)
            .flat_map(|k| (0..=s).map(move |j| (k, j)))
            .collect(),
        ProfileLayout::Appended(order) => {
            assert_eq!(rows, order.len());
            order
                .iter()
                .flat_map(|&k| (0..=s).map(move |j| (k, j)))
                .collect()
        }
        ProfileLayout::SegmentMajor => (0..=s)
            .flat_map(|j| (0..rows).map(move |k| (k, j)))
            .collect(),
    };
    let mut profile = vec![vec![VertexId::invalid(); s + 1]; rows];
    let mut sources = HashMap::new();
    for (k, j) in slots {
        let src = VertexId::new(column_vertex(k));
        let p = *old.position(src);
        let pos = Point3::new(p.x - 0.1 + 0.2 * j as f64 / s as f64, p.y, p.z);
        let v = if j == 0 && layout == ProfileLayout::ReuseOriginal {
            out.set_position(src, pos);
            src
        } else {
            out.add_vertex(pos)
        };
        profile[k][j] = v;
        sources.insert(v, src);
    }

    let rail = |v: usize, j: usize| -> VertexId {
        if v % 3 == 1 {
            profile[v / 3][j]
        } else {
            VertexId::new(v)
        }
    };
    // Column vertices sit at x = 1: the west neighbor decides the rail.
    let side = |other: usize| if other % 3 == 0 { 0 } else { s };

    for r in 0..rows - 1 {
        for c in 0..2 {
            let v = r * 3 + c;
            let j = if c == 0 { 0 } else { s };
            let corners: Vec<VertexId> =
                [v, v + 1, v + 4, v + 3].iter().map(|&u| rail(u, j)).collect();
            out.add_face(&corners)?;
        }
    }

    let first_strip = out.num_faces();
    let first_edge = out.num_edges();
    for r in 0..rows - 1 {
        for j in 0..s {
            out.add_face(&[
                profile[r][j],
                profile[r][j + 1],
                profile[r + 1][j + 1],
                profile[r + 1][j],
            ])?;
        }
    }

    for (e, w) in old.weighted_edges() {
        if old.is_edge_selected(e) {
            continue;
        }
        let (a, b) = old.edge_vertices(e);
        let (a, b) = (a.index(), b.index());
        let mapped_a = rail(a, side(b));
        let mapped_b = rail(b, side(a));
        if let Some(ne) = out.edge_between(mapped_a, mapped_b) {
            out.set_edge_weight(ne, w);
        }
    }

    let new_vertices: Vec<VertexId> = (old.num_vertices()..out.num_vertices())
        .map(VertexId::new)
        .collect();
    let new_edges: Vec<EdgeId> = (first_edge..out.num_edges()).map(EdgeId::new).collect();
    let new_faces: Vec<FaceId> = (first_strip..out.num_faces()).map(FaceId::new).collect();

    *mesh = out;
    Ok(BevelDelta {
        new_vertices,
        new_edges,
        new_faces,
        vertex_sources: sources,
    })
}

/// Profile of the column vertex in row `k` after [`bevel_grid_column`],
/// read back from the delta's provenance and ordered west to east.
pub(crate) fn column_profile(mesh: &PolyMesh, delta: &BevelDelta, k: usize) -> Vec<VertexId> {
    let src = VertexId::new(column_vertex(k));
    let mut profile: Vec<VertexId> = delta
        .vertex_sources
        .iter()
        .filter(|(_, &s)| s == src)
        .map(|(&v, _)| v)
        .collect();
    profile.sort_by(|a, b| mesh.position(*a).x.total_cmp(&mesh.position(*b).x));
    profile
}
