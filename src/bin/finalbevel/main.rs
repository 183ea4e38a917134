//! finalbevel CLI - inspect and prepare meshes for the tiered bevel.
//!
//! Usage: finalbevel <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `finalbevel --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use finalbevel::algo::bevel::executor::select_tier_edges;
use finalbevel::algo::bevel::tiers::strip_non_manifold_weights;
use finalbevel::algo::bevel::{
    collect_tiers, final_bevel_with_progress, BevelDelta, BevelHost, BevelOptions, BevelParams,
    ManifoldRule, SegmentPlan, WalkStrategy,
};
use finalbevel::algo::Progress;
use finalbevel::error::BevelError;
use finalbevel::io;
use finalbevel::mesh::PolyMesh;

#[derive(Parser)]
#[command(name = "finalbevel")]
#[command(author, version, about = "Tiered bevel weight tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh and bevel weight information
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Rule for non-manifold edges
        #[arg(long, value_enum, default_value = "wire-and-multi-face")]
        manifold_rule: RuleArg,
    },

    /// Show the tier plan: weight, offset, segments, and edge count per tier
    Plan {
        /// Input mesh file
        input: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Run every tier without cutting geometry and report what each step saw
    Rehearse {
        /// Input mesh file
        input: PathBuf,

        /// Write the resulting weights here
        output: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Drop bevel weights from non-manifold edges
    Strip {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Rule for non-manifold edges
        #[arg(long, value_enum, default_value = "wire-and-multi-face")]
        manifold_rule: RuleArg,
    },
}

/// Options shared by the commands that plan or run tiers.
#[derive(Args)]
struct OptionArgs {
    /// JSON file with bevel options; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// Bevel width for weight 1.0, in centimeters
    #[arg(short, long)]
    width: Option<f64>,

    /// Segments for every tier
    #[arg(short, long)]
    segments: Option<u32>,

    /// Use the 6/4/2 per-tier segment counts
    #[arg(long, conflicts_with = "segments")]
    tiered: bool,

    /// Weights closer than this are one tier
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Rule for non-manifold edges
    #[arg(long, value_enum)]
    manifold_rule: Option<RuleArg>,

    /// How the weight propagation walk crosses a bevel strip
    #[arg(long, value_enum)]
    walk: Option<WalkArg>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RuleArg {
    /// Wire edges and edges with more than two faces
    WireAndMultiFace,
    /// Every edge without exactly two faces
    ExactlyTwoFaces,
}

impl From<RuleArg> for ManifoldRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::WireAndMultiFace => ManifoldRule::WireAndMultiFace,
            RuleArg::ExactlyTwoFaces => ManifoldRule::ExactlyTwoFaces,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum WalkArg {
    /// Follow vertices split from the same source vertex
    Provenance,
    /// Probe neighboring vertex indices
    IndexOrder,
}

impl From<WalkArg> for WalkStrategy {
    fn from(walk: WalkArg) -> Self {
        match walk {
            WalkArg::Provenance => WalkStrategy::Provenance,
            WalkArg::IndexOrder => WalkStrategy::IndexOrder,
        }
    }
}

/// A host without a geometry kernel: it records each request and leaves
/// the mesh as it is.
struct RehearsalHost {
    calls: usize,
}

impl BevelHost for RehearsalHost {
    fn bevel(
        &mut self,
        mesh: &mut PolyMesh,
        params: &BevelParams,
    ) -> finalbevel::error::Result<BevelDelta> {
        self.calls += 1;
        info!(
            "Bevel #{}: {} edge(s), offset {:.4}, {} segments",
            self.calls,
            mesh.selected_edges().count(),
            params.offset,
            params.segments
        );
        Ok(BevelDelta::default())
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            manifold_rule,
        } => {
            cmd_info(&input, manifold_rule.into())?;
        }

        Commands::Plan { input, options } => {
            cmd_plan(&input, &resolve_options(&options)?)?;
        }

        Commands::Rehearse {
            input,
            output,
            options,
        } => {
            cmd_rehearse(&input, output.as_deref(), &resolve_options(&options)?)?;
        }

        Commands::Strip {
            input,
            output,
            manifold_rule,
        } => {
            cmd_strip(&input, &output, manifold_rule.into())?;
        }
    }

    Ok(())
}

/// Merge the options file (if any) with command-line overrides.
fn resolve_options(args: &OptionArgs) -> Result<BevelOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<BevelOptions>(&text)
                .map_err(|e| format!("invalid options file {}: {}", path.display(), e))?
        }
        None => BevelOptions::default(),
    };

    if let Some(width) = args.width {
        options.bevel_width_cm = width;
    }
    if let Some(segments) = args.segments {
        options = options.with_segments(segments);
    }
    if args.tiered {
        options = options.with_segment_plan(SegmentPlan::tiered_default());
    }
    if let Some(tolerance) = args.tolerance {
        options = options.with_weight_tolerance(tolerance);
    }
    if let Some(rule) = args.manifold_rule {
        options = options.with_manifold_rule(rule.into());
    }
    if let Some(walk) = args.walk {
        options = options.with_walk(walk.into());
    }

    options.validate()?;
    Ok(options)
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            (current * 100) / total
        };
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path, rule: ManifoldRule) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: PolyMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    let non_manifold = mesh
        .edge_ids()
        .filter(|&e| !rule.is_manifold(mesh.edge_face_count(e)))
        .collect::<Vec<_>>();
    let weighted_non_manifold = non_manifold
        .iter()
        .filter(|&&e| mesh.edge_weight(e) != 0.0)
        .count();
    println!("Weighted edges: {}", mesh.weighted_edges().count());
    println!(
        "Non-manifold edges: {} ({} weighted)",
        non_manifold.len(),
        weighted_non_manifold
    );

    let tiers = collect_tiers(&mesh, 0.0);
    if tiers.is_empty() {
        println!("Tiers: none");
    } else {
        let listed: Vec<String> = tiers.iter().map(|w| format!("{}", w)).collect();
        println!("Tiers: {}", listed.join(", "));
    }

    Ok(())
}

fn cmd_plan(input: &Path, options: &BevelOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: PolyMesh = io::load(input)?;
    let mut host = RehearsalHost { calls: 0 };

    let stripped = strip_non_manifold_weights(&mut mesh, &mut host, options.manifold_rule);
    if !stripped.is_empty() {
        println!("Dropping weight from {} non-manifold edge(s)", stripped.len());
    }

    let tiers = collect_tiers(&mesh, options.weight_tolerance);
    if tiers.is_empty() {
        println!("Nothing to bevel");
        return Ok(());
    }

    println!("{:>5}  {:>12}  {:>10}  {:>8}  {:>6}", "tier", "weight", "offset", "segments", "edges");
    for (i, weight) in tiers.iter().enumerate() {
        let edges = select_tier_edges(&mut mesh, weight, options);
        println!(
            "{:>5}  {:>12}  {:>10.4}  {:>8}  {:>6}",
            i,
            weight,
            options.offset_for(weight),
            options.segments.segments_for(i),
            edges
        );
    }
    mesh.clear_selection();

    Ok(())
}

fn cmd_rehearse(
    input: &Path,
    output: Option<&Path>,
    options: &BevelOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: PolyMesh = io::load(input)?;
    let mut host = RehearsalHost { calls: 0 };
    let progress = create_progress();

    let start = Instant::now();
    let report = final_bevel_with_progress(&mut mesh, &mut host, options, &progress)
        .map_err(|e| match &e {
            BevelError::Aborted { last_completed, .. } => format!(
                "{} (last completed tier: {})",
                e,
                last_completed.map_or("none".to_string(), |t| t.to_string())
            ),
            _ => e.to_string(),
        })?;
    let elapsed = start.elapsed();

    println!("Stripped non-manifold weights: {}", report.stripped_edges);
    for tier in &report.tier_reports {
        println!(
            "Tier {}: weight {}, offset {:.4}, {} segments, {} edge(s), {} propagated",
            tier.index,
            tier.weight,
            tier.offset,
            tier.segments,
            tier.bevelled_edges,
            tier.propagated_edges
        );
    }
    println!("Host calls: {}", host.calls);
    println!("Time: {:.2?}", elapsed);

    if let Some(output) = output {
        io::save(&mesh, output)?;
        println!("Saved: {}", output.display());
    }

    Ok(())
}

fn cmd_strip(
    input: &Path,
    output: &Path,
    rule: ManifoldRule,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: PolyMesh = io::load(input)?;
    let mut host = RehearsalHost { calls: 0 };

    let stripped = strip_non_manifold_weights(&mut mesh, &mut host, rule);
    println!("Dropped weight from {} edge(s)", stripped.len());

    io::save(&mesh, output)?;
    println!("Saved: {}", output.display());

    Ok(())
}
