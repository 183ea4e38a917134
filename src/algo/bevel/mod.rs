//! Tiered bevel driven by edge bevel weights.
//!
//! Edges carry a bevel weight; every distinct weight is a *tier*. Tiers are
//! bevelled one at a time, highest weight first, with an offset proportional
//! to the weight. Between tiers the weights on the freshly created geometry
//! are fixed up so the next, lower tier still selects one connected feature.
//!
//! The geometric bevel itself comes from a [`BevelHost`].
//!
//! # Stages
//!
//! - [`tiers`]: drop weights on non-manifold edges and collect the tiers
//! - [`executor`]: bevel one tier and weight the outline of the new bevel
//! - [`propagate`]: carry the next tier's weight across the new bevel strip
//! - [`preview`]: re-run from a backup for interactive use
//!
//! # Example
//!
//! ```
//! use finalbevel::algo::bevel::{final_bevel, BevelDelta, BevelOptions, BevelParams};
//! use finalbevel::error::Result;
//! use finalbevel::mesh::{build_weighted, PolyMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2, 3]];
//! let mut mesh: PolyMesh = build_weighted(&vertices, &faces, &[([0, 1], 1.0)]).unwrap();
//!
//! // A host that records the request and leaves the mesh alone
//! let mut requested = Vec::new();
//! let mut host = |_: &mut PolyMesh, params: &BevelParams| -> Result<BevelDelta> {
//!     requested.push(params.offset);
//!     Ok(BevelDelta::default())
//! };
//!
//! let report = final_bevel(&mut mesh, &mut host, &BevelOptions::default()).unwrap();
//! assert_eq!(report.tiers, vec![1.0]);
//! assert_eq!(requested.len(), 1);
//! ```

pub mod executor;
pub mod host;
pub mod options;
pub mod preview;
pub mod propagate;
pub mod tiers;

#[cfg(test)]
pub(crate) mod fixtures;

pub use executor::{execute_tier, TierOutcome};
pub use host::{BevelDelta, BevelHost, BevelParams, MiterOuter};
pub use options::{BevelOptions, ManifoldRule, SegmentPlan, WalkStrategy};
pub use preview::LivePreview;
pub use propagate::{propagate_weights, PropagationOutcome, PropagationScratch};
pub use tiers::{collect_tiers, extract_tiers, TierExtraction, TierList};

use log::{debug, info};

use crate::algo::progress::Progress;
use crate::error::{BevelError, Result};
use crate::mesh::{MeshIndex, PolyMesh};

/// Summary of one bevelled tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierReport {
    /// Position in the tier list (0 = highest weight).
    pub index: usize,
    /// Tier weight.
    pub weight: f64,
    /// Offset passed to the bevel.
    pub offset: f64,
    /// Segments passed to the bevel.
    pub segments: u32,
    /// Edges that were bevelled.
    pub bevelled_edges: usize,
    /// Outline edges that received the tier weight.
    pub repaired_edges: usize,
    /// Edges that received the next tier's weight.
    pub propagated_edges: usize,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BevelReport {
    /// Tier weights, highest first.
    pub tiers: Vec<f64>,
    /// Edges whose weight was dropped for being non-manifold.
    pub stripped_edges: usize,
    /// One entry per bevelled tier, in order.
    pub tier_reports: Vec<TierReport>,
}

impl BevelReport {
    /// Check whether the run left the mesh alone.
    pub fn is_no_op(&self) -> bool {
        self.stripped_edges == 0 && self.tier_reports.is_empty()
    }

    /// Total edges that received a propagated weight.
    pub fn propagated_edges(&self) -> usize {
        self.tier_reports.iter().map(|t| t.propagated_edges).sum()
    }
}

/// Bevel every weight tier of `mesh`, highest first.
///
/// The mesh is modified in place. Weights on the new geometry are part of
/// the result: the outline of each bevel keeps its tier weight, and lower
/// tiers crossing a bevel are joined up across it.
///
/// A mesh without weighted edges is returned untouched and the host is
/// never called.
///
/// # Errors
///
/// Invalid options are rejected before the mesh is touched. A failure while
/// bevelling a tier is returned as [`BevelError::Aborted`], naming the tier
/// and the last tier that completed; the mesh is then left as that failure
/// found it, so callers that need atomicity should work on a copy (see
/// [`LivePreview`]).
pub fn final_bevel<I, H>(
    mesh: &mut PolyMesh<I>,
    host: &mut H,
    options: &BevelOptions,
) -> Result<BevelReport>
where
    I: MeshIndex,
    H: BevelHost<I> + ?Sized,
{
    final_bevel_with_progress(mesh, host, options, &Progress::none())
}

/// [`final_bevel`] with a progress callback, called once per tier.
pub fn final_bevel_with_progress<I, H>(
    mesh: &mut PolyMesh<I>,
    host: &mut H,
    options: &BevelOptions,
    progress: &Progress,
) -> Result<BevelReport>
where
    I: MeshIndex,
    H: BevelHost<I> + ?Sized,
{
    options.validate()?;

    if !mesh.has_weighted_edges() {
        info!("No weighted edges, nothing to bevel");
        return Ok(BevelReport::default());
    }

    let extraction = extract_tiers(mesh, host, options);
    let tiers = extraction.tiers;
    let mut report = BevelReport {
        tiers: tiers.as_slice().to_vec(),
        stripped_edges: extraction.stripped_edges.len(),
        tier_reports: Vec::with_capacity(tiers.len()),
    };
    if tiers.is_empty() {
        info!("No tiers left after dropping non-manifold weights");
        return Ok(report);
    }

    let total = tiers.len();
    info!("Bevelling {} tier(s): {:?}", total, tiers.as_slice());

    let mut last_completed = None;
    for (i, weight) in tiers.iter().enumerate() {
        progress.report(i, total, "Bevelling tier");
        let abort = move |source: BevelError| BevelError::Aborted {
            tier: i,
            weight,
            last_completed,
            source: Box::new(source),
        };

        mesh.clear_selection();
        let outcome = execute_tier(mesh, host, options, i, weight).map_err(abort)?;

        let propagated_edges = match tiers.get(i + 1) {
            Some(next) => {
                let segments = outcome.params.segments;
                propagate_weights(mesh, &outcome.delta, options, weight, next, segments)
                    .map_err(abort)?
                    .propagated
                    .len()
            }
            None => 0,
        };
        mesh.clear_selection();

        debug!(
            "Tier {} done: {} bevelled, {} outline, {} propagated",
            i, outcome.bevelled_edges, outcome.repaired_edges, propagated_edges
        );
        report.tier_reports.push(TierReport {
            index: i,
            weight,
            offset: outcome.params.offset,
            segments: outcome.params.segments,
            bevelled_edges: outcome.bevelled_edges,
            repaired_edges: outcome.repaired_edges,
            propagated_edges,
        });
        last_completed = Some(i);
    }
    progress.report(total, total, "Done");

    info!(
        "Bevelled {} tier(s), propagated {} edge weight(s)",
        total,
        report.propagated_edges()
    );
    Ok(report)
}
