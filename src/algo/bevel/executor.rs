//! Bevelling a single weight tier.

use log::{debug, trace};

use super::host::{select_edge_flush, BevelDelta, BevelHost, BevelParams, MiterOuter};
use super::options::BevelOptions;
use crate::error::{BevelError, Result};
use crate::mesh::{EdgeId, MeshIndex, PolyMesh};

/// What one tier did to the mesh.
#[derive(Debug, Clone)]
pub struct TierOutcome<I: MeshIndex = u32> {
    /// Tier weight.
    pub weight: f64,
    /// Parameters passed to the bevel primitive.
    pub params: BevelParams,
    /// Number of edges that were bevelled.
    pub bevelled_edges: usize,
    /// Loop edges around the new bevel that were given the tier weight.
    pub repaired_edges: usize,
    /// What the bevel added.
    pub delta: BevelDelta<I>,
}

/// Bevel parameters for the tier at `tier_index` with weight `weight`.
pub fn tier_params(options: &BevelOptions, tier_index: usize, weight: f64) -> BevelParams {
    BevelParams {
        offset: options.offset_for(weight),
        segments: options.segments.segments_for(tier_index),
        profile: options.profile,
        clamp_overlap: options.clamp_overlap,
        miter_outer: MiterOuter::Arc,
    }
}

/// Replace the selection with the edges carrying `weight`.
///
/// Returns the number of selected edges.
pub fn select_tier_edges<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    weight: f64,
    options: &BevelOptions,
) -> usize {
    mesh.clear_selection();
    let matching: Vec<EdgeId<I>> = mesh
        .edges()
        .filter(|(_, e)| e.bevel_weight != 0.0 && options.weights_match(e.bevel_weight, weight))
        .map(|(id, _)| id)
        .collect();
    for &e in &matching {
        select_edge_flush(mesh, e);
    }
    matching.len()
}

/// Bevel every edge of one tier and restore the tier weight on the edges
/// bounding the new bevel.
///
/// The bevel primitive leaves the edges along its outline unweighted; they
/// take over the tier weight here so later tiers see the bevel as a
/// weighted feature. Only edges still at zero are touched.
///
/// Selection is empty on return.
pub fn execute_tier<I, H>(
    mesh: &mut PolyMesh<I>,
    host: &mut H,
    options: &BevelOptions,
    tier_index: usize,
    weight: f64,
) -> Result<TierOutcome<I>>
where
    I: MeshIndex,
    H: BevelHost<I> + ?Sized,
{
    let bevelled_edges = select_tier_edges(mesh, weight, options);
    if bevelled_edges == 0 {
        mesh.clear_selection();
        return Err(BevelError::EmptySelection { weight });
    }

    let params = tier_params(options, tier_index, weight);
    debug!(
        "Tier {}: bevelling {} edge(s), offset {:.4}, {} segments",
        tier_index, bevelled_edges, params.offset, params.segments
    );

    let delta = match host.bevel(mesh, &params) {
        Ok(delta) => delta,
        Err(e) => {
            mesh.clear_selection();
            return Err(e);
        }
    };

    mesh.clear_selection();
    for &f in &delta.new_faces {
        mesh.select_face(f, true);
    }
    host.region_to_loop(mesh);

    let outline: Vec<EdgeId<I>> = mesh
        .selected_edges()
        .filter(|&e| mesh.edge_weight(e) == 0.0)
        .collect();
    for &e in &outline {
        mesh.set_edge_weight(e, weight);
    }
    mesh.clear_selection();
    trace!("Tier {}: weighted {} outline edge(s)", tier_index, outline.len());

    Ok(TierOutcome {
        weight,
        params,
        bevelled_edges,
        repaired_edges: outline.len(),
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::bevel::fixtures::{
        bevel_column, bevel_quad_ring, column_profile, cross_grid, weight_between,
        weighted_quad, ProfileLayout, ScriptedHost,
    };

    #[test]
    fn test_single_quad_all_edges() {
        let mut mesh = weighted_quad();
        let mut host = ScriptedHost::new().then(bevel_quad_ring);
        let options = BevelOptions::with_width(20.0);

        let outcome = execute_tier(&mut mesh, &mut host, &options, 0, 1.0).unwrap();

        assert_eq!(host.calls.len(), 1);
        let (params, selected) = &host.calls[0];
        assert!((params.offset - 0.2).abs() < 1e-12);
        assert_eq!(params.segments, 4);
        assert_eq!(params.miter_outer, MiterOuter::Arc);
        assert_eq!(selected, &vec![[0, 1], [0, 3], [1, 2], [2, 3]]);

        assert_eq!(outcome.bevelled_edges, 4);
        // Outer boundary and the inset quad
        assert_eq!(outcome.repaired_edges, 8);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6), (6, 7), (7, 4)] {
            assert_eq!(weight_between(&mesh, a, b), Some(1.0), "edge {}-{}", a, b);
        }
        // Corner edges between strips stay unweighted
        for k in 0..4 {
            assert_eq!(weight_between(&mesh, k, k + 4), Some(0.0));
        }
        assert!(mesh.selection_is_empty());
    }

    #[test]
    fn test_empty_tier_is_an_error() {
        let mut mesh = weighted_quad();
        let mut host = ScriptedHost::new();
        let result = execute_tier(&mut mesh, &mut host, &BevelOptions::default(), 0, 0.5);

        match result {
            Err(BevelError::EmptySelection { weight }) => assert_eq!(weight, 0.5),
            other => panic!("expected empty selection, got {:?}", other.map(|o| o.weight)),
        }
        assert!(host.calls.is_empty());
        assert!(mesh.selection_is_empty());
    }

    #[test]
    fn test_host_failure_propagates() {
        let mut mesh = weighted_quad();
        let mut host = ScriptedHost::new().then(|_: &mut PolyMesh, _: &BevelParams| {
            Err(BevelError::primitive("overlapping geometry"))
        });
        let result = execute_tier(&mut mesh, &mut host, &BevelOptions::default(), 0, 1.0);
        assert!(matches!(result, Err(BevelError::Primitive { .. })));
        assert!(mesh.selection_is_empty());
    }

    #[test]
    fn test_column_outline_weighted() {
        let mut mesh = cross_grid();
        let segments = 4;
        let mut host = ScriptedHost::new().then(move |m: &mut PolyMesh, _: &BevelParams| {
            bevel_column(m, segments, ProfileLayout::ReuseOriginal)
        });
        let options = BevelOptions::default().with_segments(segments);

        let outcome = execute_tier(&mut mesh, &mut host, &options, 0, 2.0).unwrap();
        assert_eq!(outcome.bevelled_edges, 2);
        assert_eq!(host.calls[0].1, vec![[1, 4], [4, 7]]);

        // Two side rails of two edges each, plus the open cross edges at
        // the bottom and top of the strip.
        assert_eq!(outcome.repaired_edges, 4 + 2 * segments as usize);

        // The strip crossing the center stays unweighted for now.
        let center = column_profile(&mesh, &outcome.delta, 1);
        assert_eq!(center.len(), segments as usize + 1);
        for pair in center.windows(2) {
            let e = mesh.edge_between(pair[0], pair[1]).unwrap();
            assert_eq!(mesh.edge_weight(e), 0.0);
        }

        // The lower tier was carried onto the new east rail.
        assert_eq!(weight_between(&mesh, 3, 4), Some(1.0));
        let east = center[segments as usize];
        let e = mesh.edge_between(east, crate::mesh::VertexId::new(5)).unwrap();
        assert_eq!(mesh.edge_weight(e), 1.0);
    }

    #[test]
    fn test_tolerance_selects_near_weights() {
        let mut mesh = weighted_quad();
        let e = mesh
            .edge_between(crate::mesh::VertexId::new(0), crate::mesh::VertexId::new(1))
            .unwrap();
        mesh.set_edge_weight(e, 1.0 + 1e-9);

        let exact = BevelOptions::default();
        assert_eq!(select_tier_edges(&mut mesh, 1.0, &exact), 3);

        let loose = BevelOptions::default().with_weight_tolerance(1e-6);
        assert_eq!(select_tier_edges(&mut mesh, 1.0 + 1e-9, &loose), 4);
        assert_eq!(select_tier_edges(&mut mesh, 1.0, &loose), 3);
    }

    #[test]
    fn test_tolerance_puts_each_edge_in_one_tier() {
        let mut mesh = weighted_quad();
        for (pair, w) in [([0, 1], 1.0), ([1, 2], 0.95), ([2, 3], 0.88), ([3, 0], 0.88)] {
            let e = mesh
                .edge_between(
                    crate::mesh::VertexId::new(pair[0]),
                    crate::mesh::VertexId::new(pair[1]),
                )
                .unwrap();
            mesh.set_edge_weight(e, w);
        }

        let options = BevelOptions::default().with_weight_tolerance(0.1);
        let tiers = crate::algo::bevel::collect_tiers(&mesh, options.weight_tolerance);
        assert_eq!(tiers.as_slice(), &[1.0, 0.88]);

        let per_tier: Vec<usize> = tiers
            .iter()
            .map(|w| select_tier_edges(&mut mesh, w, &options))
            .collect();
        assert_eq!(per_tier, vec![2, 2]);
        assert_eq!(per_tier.iter().sum::<usize>(), mesh.num_edges());
    }
}
