//! Options for the tiered bevel.

use serde::{Deserialize, Serialize};

use crate::error::{BevelError, Result};

/// Allowed range for [`BevelOptions::bevel_width_cm`].
pub const WIDTH_RANGE: (f64, f64) = (0.001, 1000.0);

/// Allowed range for [`BevelOptions::profile`].
pub const PROFILE_RANGE: (f64, f64) = (0.0, 1.0);

/// Allowed range for any segment count.
pub const SEGMENT_RANGE: (u32, u32) = (2, 100);

/// How many segments each tier is bevelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPlan {
    /// One count for every tier.
    Uniform(u32),

    /// Separate counts for the first, the second, and all remaining tiers.
    Tiered {
        /// Segments for the highest weight.
        primary: u32,
        /// Segments for the second highest weight.
        secondary: u32,
        /// Segments for every lower weight.
        tertiary: u32,
    },
}

impl SegmentPlan {
    /// Tiered plan with the historical 6/4/2 defaults.
    pub fn tiered_default() -> Self {
        SegmentPlan::Tiered {
            primary: 6,
            secondary: 4,
            tertiary: 2,
        }
    }

    /// Segment count for the tier at `tier_index` (0 = highest weight).
    pub fn segments_for(&self, tier_index: usize) -> u32 {
        match *self {
            SegmentPlan::Uniform(n) => n,
            SegmentPlan::Tiered {
                primary,
                secondary,
                tertiary,
            } => match tier_index {
                0 => primary,
                1 => secondary,
                _ => tertiary,
            },
        }
    }

    fn counts(&self) -> Vec<(&'static str, u32)> {
        match *self {
            SegmentPlan::Uniform(n) => vec![("segments", n)],
            SegmentPlan::Tiered {
                primary,
                secondary,
                tertiary,
            } => vec![
                ("primary_segments", primary),
                ("secondary_segments", secondary),
                ("tertiary_segments", tertiary),
            ],
        }
    }
}

impl Default for SegmentPlan {
    fn default() -> Self {
        SegmentPlan::Uniform(4)
    }
}

/// Which edges count as non-manifold and lose their weight before tiering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifoldRule {
    /// Wire edges (no faces) and edges shared by more than two faces.
    /// Open boundary edges keep their weight.
    #[default]
    WireAndMultiFace,

    /// Anything not bordering exactly two faces, open boundaries included.
    ExactlyTwoFaces,
}

impl ManifoldRule {
    /// Check whether an edge with `face_count` bordering faces is manifold.
    #[inline]
    pub fn is_manifold(self, face_count: usize) -> bool {
        match self {
            ManifoldRule::WireAndMultiFace => face_count == 1 || face_count == 2,
            ManifoldRule::ExactlyTwoFaces => face_count == 2,
        }
    }
}

/// How the propagation walk finds the next vertex across a bevel strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkStrategy {
    /// Follow zero-weight edges to vertices split from the same source
    /// vertex, as reported by the bevel's delta.
    #[default]
    Provenance,

    /// Probe the vertices at index +1 and -1. Relies on the host appending
    /// profile vertices contiguously; stepping outside the vertex range is
    /// an error.
    IndexOrder,
}

/// Options for [`final_bevel`](super::final_bevel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BevelOptions {
    /// Bevel width for a weight of 1.0, in centimeters.
    pub bevel_width_cm: f64,

    /// Bevel profile shape (0.0 to 1.0, 0.5 is round).
    pub profile: f64,

    /// Segment counts per tier.
    pub segments: SegmentPlan,

    /// Ask the bevel primitive to clamp overlapping offsets.
    pub clamp_overlap: bool,

    /// Weights closer than this are one tier. `0.0` keeps every
    /// bit-distinct weight as its own tier.
    pub weight_tolerance: f64,

    /// Rule for stripping weights off non-manifold edges.
    pub manifold_rule: ManifoldRule,

    /// Neighbor rule for the propagation walk.
    pub walk: WalkStrategy,
}

impl Default for BevelOptions {
    fn default() -> Self {
        Self {
            bevel_width_cm: 20.0,
            profile: 0.5,
            segments: SegmentPlan::default(),
            clamp_overlap: false,
            weight_tolerance: 0.0,
            manifold_rule: ManifoldRule::default(),
            walk: WalkStrategy::default(),
        }
    }
}

impl BevelOptions {
    /// Create default options with the given bevel width.
    pub fn with_width(bevel_width_cm: f64) -> Self {
        Self {
            bevel_width_cm,
            ..Self::default()
        }
    }

    /// Set the bevel profile.
    pub fn with_profile(mut self, profile: f64) -> Self {
        self.profile = profile;
        self
    }

    /// Use one segment count for every tier.
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = SegmentPlan::Uniform(segments);
        self
    }

    /// Set the segment plan.
    pub fn with_segment_plan(mut self, plan: SegmentPlan) -> Self {
        self.segments = plan;
        self
    }

    /// Set whether the primitive clamps overlapping offsets.
    pub fn with_clamp_overlap(mut self, clamp: bool) -> Self {
        self.clamp_overlap = clamp;
        self
    }

    /// Set the tier equality tolerance.
    pub fn with_weight_tolerance(mut self, tolerance: f64) -> Self {
        self.weight_tolerance = tolerance;
        self
    }

    /// Set the non-manifold rule.
    pub fn with_manifold_rule(mut self, rule: ManifoldRule) -> Self {
        self.manifold_rule = rule;
        self
    }

    /// Set the propagation walk strategy.
    pub fn with_walk(mut self, walk: WalkStrategy) -> Self {
        self.walk = walk;
        self
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = WIDTH_RANGE;
        if !(lo..=hi).contains(&self.bevel_width_cm) {
            return Err(BevelError::invalid_param(
                "bevel_width_cm",
                self.bevel_width_cm,
                "must be in [0.001, 1000]",
            ));
        }

        let (lo, hi) = PROFILE_RANGE;
        if !(lo..=hi).contains(&self.profile) {
            return Err(BevelError::invalid_param(
                "profile",
                self.profile,
                "must be in [0, 1]",
            ));
        }

        let (lo, hi) = SEGMENT_RANGE;
        for (name, count) in self.segments.counts() {
            if !(lo..=hi).contains(&count) {
                return Err(BevelError::invalid_param(name, count, "must be in [2, 100]"));
            }
        }

        if !self.weight_tolerance.is_finite() || self.weight_tolerance < 0.0 {
            return Err(BevelError::invalid_param(
                "weight_tolerance",
                self.weight_tolerance,
                "must be finite and non-negative",
            ));
        }

        Ok(())
    }

    /// Bevel offset for a tier weight: width (cm → m) scaled by the weight.
    #[inline]
    pub fn offset_for(&self, weight: f64) -> f64 {
        (self.bevel_width_cm * 0.01) * weight
    }

    /// Check whether an edge weight belongs to a tier.
    ///
    /// A tier is represented by the highest weight of its group, so a
    /// weight matches when it lies at most `weight_tolerance` below the
    /// tier. Tiers are more than the tolerance apart, which puts every
    /// weight in exactly one of them.
    #[inline]
    pub fn weights_match(&self, weight: f64, tier: f64) -> bool {
        if self.weight_tolerance == 0.0 {
            weight == tier
        } else {
            weight <= tier && tier - weight <= self.weight_tolerance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BevelOptions::default();
        assert_eq!(options.bevel_width_cm, 20.0);
        assert_eq!(options.profile, 0.5);
        assert_eq!(options.segments, SegmentPlan::Uniform(4));
        assert!(!options.clamp_overlap);
        assert_eq!(options.manifold_rule, ManifoldRule::WireAndMultiFace);
        assert_eq!(options.walk, WalkStrategy::Provenance);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_offset_scales_with_weight() {
        let options = BevelOptions::with_width(20.0);
        assert!((options.offset_for(1.0) - 0.2).abs() < 1e-12);
        assert!((options.offset_for(0.5) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_tiered_plan() {
        let plan = SegmentPlan::tiered_default();
        assert_eq!(plan.segments_for(0), 6);
        assert_eq!(plan.segments_for(1), 4);
        assert_eq!(plan.segments_for(2), 2);
        assert_eq!(plan.segments_for(7), 2);
        assert_eq!(SegmentPlan::Uniform(3).segments_for(5), 3);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(BevelOptions::with_width(0.0).validate().is_err());
        assert!(BevelOptions::with_width(1000.0).validate().is_ok());
        assert!(BevelOptions::default().with_profile(1.5).validate().is_err());
        assert!(BevelOptions::default().with_segments(1).validate().is_err());
        assert!(BevelOptions::default().with_segments(101).validate().is_err());
        assert!(BevelOptions::default().with_segments(2).validate().is_ok());
        assert!(BevelOptions::default()
            .with_weight_tolerance(-1.0)
            .validate()
            .is_err());

        let bad_tier = BevelOptions::default().with_segment_plan(SegmentPlan::Tiered {
            primary: 6,
            secondary: 1,
            tertiary: 2,
        });
        match bad_tier.validate() {
            Err(BevelError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "secondary_segments")
            }
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_weights_match() {
        let exact = BevelOptions::default();
        assert!(exact.weights_match(1.0, 1.0));
        assert!(!exact.weights_match(1.0 + 1e-9, 1.0));

        let loose = BevelOptions::default().with_weight_tolerance(1e-6);
        assert!(loose.weights_match(1.0, 1.0 + 1e-9));
        assert!(!loose.weights_match(1.1, 1.0));
        // The tier is the top of its group; nothing above it belongs
        assert!(!loose.weights_match(1.0 + 1e-9, 1.0));
    }

    #[test]
    fn test_weight_between_two_tiers_matches_one() {
        // Grouped from the top: 1.0 absorbs 0.95, 0.88 starts a new tier
        let options = BevelOptions::default().with_weight_tolerance(0.1);
        assert!(options.weights_match(0.95, 1.0));
        assert!(!options.weights_match(0.95, 0.88));
        assert!(options.weights_match(0.88, 0.88));
        assert!(!options.weights_match(0.88, 1.0));
    }

    #[test]
    fn test_manifold_rules() {
        let default_rule = ManifoldRule::default();
        assert!(!default_rule.is_manifold(0));
        assert!(default_rule.is_manifold(1));
        assert!(default_rule.is_manifold(2));
        assert!(!default_rule.is_manifold(3));

        assert!(!ManifoldRule::ExactlyTwoFaces.is_manifold(1));
        assert!(ManifoldRule::ExactlyTwoFaces.is_manifold(2));
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "bevel_width_cm": 5.0,
            "segments": { "tiered": { "primary": 8, "secondary": 4, "tertiary": 2 } },
            "walk": "index_order"
        }"#;
        let options: BevelOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.bevel_width_cm, 5.0);
        assert_eq!(options.profile, 0.5);
        assert_eq!(options.segments.segments_for(0), 8);
        assert_eq!(options.walk, WalkStrategy::IndexOrder);
        assert!(options.validate().is_ok());
    }
}
