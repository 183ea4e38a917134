//! # finalbevel
//!
//! Tiered, weight-driven bevelling for polygon meshes.
//!
//! Edges of a [`PolyMesh`](mesh::PolyMesh) carry a bevel weight. Every
//! distinct weight is a tier; tiers are bevelled one after another, highest
//! first, each with an offset proportional to its weight. After each bevel
//! the weights on the new geometry are re-derived so the next tier still
//! selects a clean, connected feature.
//!
//! The geometric bevel is supplied by a host through the
//! [`BevelHost`](algo::bevel::BevelHost) trait; this crate owns the tier
//! bookkeeping around it.
//!
//! ## Features
//!
//! - **Polygon mesh** with per-edge weights and selection state, typed indices
//! - **Tier extraction** with non-manifold weight stripping
//! - **Weight propagation** across fresh bevel strips, by vertex provenance
//!   or by the legacy index-order walk
//! - **Live preview** helper that re-runs from a backup
//! - **File formats**: PLY with an `edge` element, JSON documents
//!
//! ## Quick Start
//!
//! ```no_run
//! use finalbevel::prelude::*;
//!
//! let mut mesh: PolyMesh = finalbevel::io::load("model.ply").unwrap();
//!
//! // A host that knows how to bevel the selected edges
//! let mut host = |mesh: &mut PolyMesh, params: &BevelParams| -> Result<BevelDelta> {
//!     // ... cut the geometry, report what was added ...
//!     Ok(BevelDelta::default())
//! };
//!
//! let options = BevelOptions::with_width(5.0).with_segments(3);
//! let report = final_bevel(&mut mesh, &mut host, &options).unwrap();
//! println!("Bevelled tiers: {:?}", report.tiers);
//!
//! finalbevel::io::save(&mesh, "bevelled.ply").unwrap();
//! ```
//!
//! ## Planning Without a Host
//!
//! ```
//! use finalbevel::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2, 3]];
//! let weights = vec![([0, 1], 2.0), ([1, 2], 1.0), ([2, 3], 1.0)];
//!
//! let mesh: PolyMesh = build_weighted(&vertices, &faces, &weights).unwrap();
//! let tiers = collect_tiers(&mesh, 0.0);
//! assert_eq!(tiers.as_slice(), &[2.0, 1.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use finalbevel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::bevel::{
        collect_tiers, final_bevel, final_bevel_with_progress, BevelDelta, BevelHost,
        BevelOptions, BevelParams, BevelReport, LivePreview, ManifoldRule, SegmentPlan,
        TierReport, WalkStrategy,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{BevelError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_weighted, to_face_vertex, EdgeId, FaceId, MeshIndex,
        PolyMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_prelude_single_tier() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3]];
        let mut mesh: PolyMesh = build_weighted(&vertices, &faces, &[([2, 3], 0.5)]).unwrap();

        let mut calls = 0;
        let mut host = |_: &mut PolyMesh, params: &BevelParams| -> Result<BevelDelta> {
            calls += 1;
            assert!((params.offset - 0.1).abs() < 1e-12);
            Ok(BevelDelta::default())
        };
        let report = final_bevel(&mut mesh, &mut host, &BevelOptions::default()).unwrap();

        assert_eq!(calls, 1);
        assert_eq!(report.tiers, vec![0.5]);
        assert!(mesh.is_valid());
    }
}
