//! Weight tier extraction.
//!
//! Before any bevel runs, weights on non-manifold edges are dropped (the
//! bevel primitive can't handle them) and the remaining distinct positive
//! weights become the tiers, highest first.

use log::{debug, warn};

use super::host::BevelHost;
use super::options::{BevelOptions, ManifoldRule};
use crate::mesh::{EdgeId, MeshIndex, PolyMesh};

/// Distinct positive bevel weights in strictly descending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierList(Vec<f64>);

impl TierList {
    /// Build a tier list from raw edge weights.
    ///
    /// Zero, negative, and non-finite weights are ignored. With a positive
    /// `tolerance`, weights within `tolerance` of an already accepted tier
    /// collapse into it; the highest weight of a group represents it.
    pub fn from_weights<W>(weights: W, tolerance: f64) -> Self
    where
        W: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = weights
            .into_iter()
            .filter(|w| w.is_finite() && *w > 0.0)
            .collect();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let mut tiers: Vec<f64> = Vec::with_capacity(sorted.len());
        for w in sorted {
            match tiers.last() {
                Some(&last) if last == w => {}
                Some(&last) if tolerance > 0.0 && last - w <= tolerance => {}
                _ => tiers.push(w),
            }
        }
        Self(tiers)
    }

    /// Number of tiers.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether there are no tiers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weight of tier `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    /// Tier weights, highest first.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over tier weights, highest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Consume into the underlying weights.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// Result of tier extraction.
#[derive(Debug, Clone)]
pub struct TierExtraction<I: MeshIndex = u32> {
    /// Tiers to bevel, highest first.
    pub tiers: TierList,
    /// Edges whose weight was zeroed for being non-manifold.
    pub stripped_edges: Vec<EdgeId<I>>,
}

/// Zero the weight of every non-manifold edge.
///
/// Selection is cleared before and after. Returns the edges that actually
/// lost a non-zero weight.
pub fn strip_non_manifold_weights<I, H>(
    mesh: &mut PolyMesh<I>,
    host: &mut H,
    rule: ManifoldRule,
) -> Vec<EdgeId<I>>
where
    I: MeshIndex,
    H: BevelHost<I> + ?Sized,
{
    mesh.clear_selection();
    host.select_non_manifold_edges(mesh, rule);

    let selected: Vec<EdgeId<I>> = mesh.selected_edges().collect();
    let mut stripped = Vec::new();
    for e in selected {
        if mesh.edge_weight(e) != 0.0 {
            mesh.set_edge_weight(e, 0.0);
            stripped.push(e);
        }
    }
    mesh.clear_selection();

    if !stripped.is_empty() {
        warn!(
            "Dropped bevel weight from {} non-manifold edge(s)",
            stripped.len()
        );
    }
    stripped
}

/// Collect the tiers currently present on the mesh.
pub fn collect_tiers<I: MeshIndex>(mesh: &PolyMesh<I>, tolerance: f64) -> TierList {
    TierList::from_weights(mesh.weighted_edges().map(|(_, w)| w), tolerance)
}

/// Strip non-manifold weights, then collect the remaining tiers.
pub fn extract_tiers<I, H>(
    mesh: &mut PolyMesh<I>,
    host: &mut H,
    options: &BevelOptions,
) -> TierExtraction<I>
where
    I: MeshIndex,
    H: BevelHost<I> + ?Sized,
{
    let stripped_edges = strip_non_manifold_weights(mesh, host, options.manifold_rule);
    let tiers = collect_tiers(mesh, options.weight_tolerance);
    debug!("Extracted {} tier(s): {:?}", tiers.len(), tiers.as_slice());

    TierExtraction {
        tiers,
        stripped_edges,
    }
}
