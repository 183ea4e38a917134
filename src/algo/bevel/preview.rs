//! Re-running the tiered bevel on a pristine copy.
//!
//! Interactive hosts re-run the whole algorithm whenever a parameter
//! changes. [`LivePreview`] keeps the mesh as it was before the first run so
//! each run starts from the same input, and so a failed run can be undone.

use log::debug;

use super::host::BevelHost;
use super::options::BevelOptions;
use super::{final_bevel, BevelReport};
use crate::error::Result;
use crate::mesh::{MeshIndex, PolyMesh};

/// A backup of the input mesh plus the options of the last run.
#[derive(Debug, Clone)]
pub struct LivePreview<I: MeshIndex = u32> {
    backup: PolyMesh<I>,
    options: Option<BevelOptions>,
    runs: usize,
}

impl<I: MeshIndex> LivePreview<I> {
    /// Take a backup of `mesh`.
    pub fn new(mesh: &PolyMesh<I>) -> Self {
        Self {
            backup: mesh.clone(),
            options: None,
            runs: 0,
        }
    }

    /// The untouched input mesh.
    pub fn backup(&self) -> &PolyMesh<I> {
        &self.backup
    }

    /// Options of the last successful run.
    pub fn last_options(&self) -> Option<&BevelOptions> {
        self.options.as_ref()
    }

    /// Number of successful runs so far.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Run the tiered bevel on a fresh copy of the backup.
    ///
    /// On failure the backup is unaffected and the previous options are kept.
    pub fn apply<H>(
        &mut self,
        host: &mut H,
        options: &BevelOptions,
    ) -> Result<(PolyMesh<I>, BevelReport)>
    where
        H: BevelHost<I> + ?Sized,
    {
        let mut working = self.backup.clone();
        let report = final_bevel(&mut working, host, options)?;

        self.options = Some(options.clone());
        self.runs += 1;
        debug!("Preview run {} produced {} tier(s)", self.runs, report.tier_reports.len());
        Ok((working, report))
    }

    /// A fresh copy of the untouched input.
    pub fn restore(&self) -> PolyMesh<I> {
        self.backup.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::bevel::fixtures::{bevel_quad_ring, weighted_quad, ScriptedHost};
    use crate::algo::bevel::host::BevelParams;
    use crate::error::BevelError;

    #[test]
    fn test_each_run_starts_from_backup() {
        let mesh = weighted_quad();
        let mut preview = LivePreview::new(&mesh);
        let mut host = ScriptedHost::new()
            .then(bevel_quad_ring)
            .then(bevel_quad_ring);

        let (first, _) = preview
            .apply(&mut host, &BevelOptions::with_width(20.0))
            .unwrap();
        let (second, report) = preview
            .apply(&mut host, &BevelOptions::with_width(10.0))
            .unwrap();

        // Both runs saw the original four edges
        assert_eq!(host.calls[0].1.len(), 4);
        assert_eq!(host.calls[1].1.len(), 4);
        assert!((host.calls[1].0.offset - 0.1).abs() < 1e-12);

        assert_eq!(first.num_faces(), second.num_faces());
        assert_eq!(report.tiers, vec![1.0]);
        assert_eq!(preview.runs(), 2);
        assert_eq!(preview.last_options().unwrap().bevel_width_cm, 10.0);
        assert_eq!(preview.backup().num_faces(), 1);
    }

    #[test]
    fn test_failed_run_keeps_backup() {
        let mesh = weighted_quad();
        let mut preview = LivePreview::new(&mesh);
        let mut host = ScriptedHost::new().then(|_: &mut PolyMesh, _: &BevelParams| {
            Err(BevelError::primitive("no room"))
        });

        let result = preview.apply(&mut host, &BevelOptions::default());
        assert!(matches!(result, Err(BevelError::Aborted { tier: 0, .. })));
        assert_eq!(preview.runs(), 0);
        assert!(preview.last_options().is_none());

        let restored = preview.restore();
        assert_eq!(restored.num_edges(), 4);
        assert_eq!(restored.weighted_edges().count(), 4);
    }
}
