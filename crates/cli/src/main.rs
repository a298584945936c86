use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clattice::api::{
    combinations, minimum_area_pair, read_bases, search_file, search_par, write_solutions_file,
    Combination, CoefficientRange, Crystal, DistanceTest, RotationSense, SearchCfg, Supercell,
    SweepBoundary, SweepSpec,
};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod provenance;
mod table;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "clattice")]
#[command(about = "Find coincidence lattices within combinations of 2D crystals")]
#[command(
    after_help = "If you find this tool useful, please cite J. Phys. Chem. C, 2016, 120 (20), pp 10895-10908."
)]
struct Cmd {
    /// Log every angle sample
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for `--parallel` sweeps (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Search coincidences for the two bases stored in a flat text file
    Search {
        /// Eight numbers: `xA1 xA2 / yA1 yA2 / xB1 xB2 / yB1 yB2`
        #[arg(long, default_value = "lattices.tmp")]
        input: PathBuf,
        /// Per-angle coincidence blocks
        #[arg(short, long, default_value = "coincidences.tmp")]
        out: PathBuf,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Tabulate minimum-area supercells for every pair of crystal files
    Combine {
        /// 2D crystal description files
        #[arg(required = true)]
        input_files: Vec<PathBuf>,
        /// Output file for the combinations table
        #[arg(short, long, default_value = "CoincidenceLattices.dat")]
        output: PathBuf,
        /// Maximum number of atoms inside the supercell
        #[arg(short = 'n', long = "n-atoms", default_value_t = 100)]
        max_atoms: u64,
        /// Also combine each crystal with itself
        #[arg(short = 'f', long)]
        self_combinations: bool,
        /// Also export the table as CSV (or Parquet, by extension)
        #[arg(long)]
        export: Option<PathBuf>,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Sweep and tolerance flags shared by all search commands.
#[derive(Args, Clone, Debug, Serialize)]
struct SweepArgs {
    /// Interval of angles (degrees) to investigate
    #[arg(
        short = 'a',
        long = "angles",
        num_args = 2,
        value_names = ["ANGLE_MIN", "ANGLE_MAX"],
        default_values_t = [0.0, 30.0],
        allow_negative_numbers = true
    )]
    angles: Vec<f64>,
    /// Step for the investigation of angles
    #[arg(short = 's', long = "angles-step", default_value_t = 0.1)]
    step: f64,
    /// Where the sweep stops
    #[arg(long, value_enum, default_value_t = SweepEnd::Closed)]
    sweep_end: SweepEnd,
    /// Integer cutoff for the coefficient search
    #[arg(short = 'N', value_name = "NMAX", default_value_t = 7, allow_negative_numbers = true)]
    nmax: i32,
    /// Maximum relative mismatch (strain) between coinciding vectors
    #[arg(short, long, default_value_t = 0.02)]
    tolerance: f64,
    /// Maximum angle (degrees) between coinciding vectors
    #[arg(long)]
    angle_tolerance: Option<f64>,
    #[arg(long, value_enum, default_value_t = Distance::Euclidean)]
    distance: Distance,
    #[arg(long, value_enum, default_value_t = Range::Inclusive)]
    range: Range,
    #[arg(long, value_enum, default_value_t = Sense::Ccw)]
    rotation: Sense,
    /// Scan angles on the rayon pool (output order is unchanged)
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum SweepEnd {
    /// angle <= end
    Closed,
    /// angle < end + step
    Padded,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Distance {
    CoordinateWise,
    Euclidean,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Range {
    /// all coefficients in [-N, N)
    Exclusive,
    /// m1, m2, n1 in [-N, N]; n2 in [-N, N)
    InclusiveOpenN2,
    /// all coefficients in [-N, N]
    Inclusive,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Sense {
    Ccw,
    Cw,
}

impl SweepArgs {
    fn sweep(&self) -> SweepSpec {
        let boundary = match self.sweep_end {
            SweepEnd::Closed => SweepBoundary::Closed,
            SweepEnd::Padded => SweepBoundary::Padded,
        };
        SweepSpec::new(self.angles[0], self.angles[1], self.step).with_boundary(boundary)
    }

    fn cfg(&self) -> SearchCfg {
        SearchCfg {
            nmax: self.nmax,
            tolerance: self.tolerance,
            angle_tolerance: self.angle_tolerance,
            distance: match self.distance {
                Distance::CoordinateWise => DistanceTest::CoordinateWise,
                Distance::Euclidean => DistanceTest::Euclidean,
            },
            range: match self.range {
                Range::Exclusive => CoefficientRange::Exclusive,
                Range::InclusiveOpenN2 => CoefficientRange::InclusiveOpenN2,
                Range::Inclusive => CoefficientRange::Inclusive,
            },
            rotation: match self.rotation {
                Sense::Ccw => RotationSense::CounterClockwise,
                Sense::Cw => RotationSense::Clockwise,
            },
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    if let Some(threads) = cmd.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| anyhow::anyhow!("configuring thread pool: {e}"))?;
        tracing::info!(threads, "rayon pool");
    }
    match cmd.action {
        Action::Search { input, out, sweep } => search(&input, &out, &sweep),
        Action::Combine {
            input_files,
            output,
            max_atoms,
            self_combinations,
            export,
            sweep,
        } => combine(
            &input_files,
            &output,
            max_atoms,
            self_combinations,
            export.as_deref(),
            &sweep,
        ),
        Action::Report => report(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn search(input: &Path, out: &Path, args: &SweepArgs) -> Result<()> {
    let sweep = args.sweep();
    let cfg = args.cfg();
    tracing::info!(
        input = %input.display(),
        out = %out.display(),
        samples = sweep.len(),
        nmax = cfg.nmax,
        tolerance = cfg.tolerance,
        "search"
    );
    ensure_parent(out)?;
    let summary = if args.parallel {
        let (a, b) = read_bases(input)?;
        let blocks = search_par(&a, &b, &sweep, &cfg, None)?;
        write_solutions_file(out, blocks).with_context(|| format!("writing {}", out.display()))?
    } else {
        search_file(input, out, &sweep, &cfg)?
    };
    tracing::info!(
        angles = summary.angles,
        solutions = summary.solutions,
        "search done"
    );

    let payload = Payload::new("search", serde_json::to_value(args)?)
        .with_inputs([input])
        .with_summary(serde_json::json!({
            "angles": summary.angles,
            "solutions": summary.solutions,
        }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn pair_supercells(
    combo: &Combination<'_>,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
    parallel: bool,
) -> Result<Vec<Supercell>> {
    if !parallel {
        return Ok(combo.supercells(sweep, cfg)?);
    }
    let blocks = search_par(&combo.first.basis, &combo.second.basis, sweep, cfg, None)?;
    Ok(blocks
        .into_iter()
        .filter_map(|b| {
            minimum_area_pair(&b.solutions)
                .map(|pair| Supercell::from_pair(b.angle, pair, combo.first, combo.second))
        })
        .collect())
}

fn combine(
    inputs: &[PathBuf],
    output: &Path,
    max_atoms: u64,
    self_combinations: bool,
    export: Option<&Path>,
    args: &SweepArgs,
) -> Result<()> {
    let crystals = inputs
        .iter()
        .map(|p| Crystal::from_path(p).with_context(|| format!("loading crystal {}", p.display())))
        .collect::<Result<Vec<_>>>()?;
    let sweep = args.sweep();
    let cfg = args.cfg();
    // Fail on bad parameters before any output is touched.
    sweep.validate()?;
    cfg.validate()?;

    let pairs = combinations(&crystals, self_combinations);
    tracing::info!(
        crystals = crystals.len(),
        pairs = pairs.len(),
        samples = sweep.len(),
        "combine"
    );
    let mut cells = Vec::new();
    for combo in &pairs {
        cells.extend(pair_supercells(combo, &sweep, &cfg, args.parallel)?);
    }

    ensure_parent(output)?;
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let rows = table::write_matrix_table(BufWriter::new(file), table::DEFAULT_TITLE, &cells, max_atoms)
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(supercells = cells.len(), rows, output = %output.display(), "table written");

    let mut outputs = vec![output.to_path_buf()];
    if let Some(path) = export {
        let kept: Vec<Supercell> = cells.iter().filter(|c| c.atoms <= max_atoms).cloned().collect();
        let mut frame = export::supercell_frame(&kept)?;
        ensure_parent(path)?;
        export::write_frame(&mut frame, path)?;
        outputs.push(path.to_path_buf());
    }

    for artifact in &outputs {
        let payload = Payload::new("combine", serde_json::to_value(args)?)
            .with_inputs(inputs)
            .with_summary(serde_json::json!({
                "pairs": pairs.len(),
                "supercells": cells.len(),
                "rows": rows,
                "max_atoms": max_atoms,
                "self_combinations": self_combinations,
            }));
        provenance::write_sidecar(artifact, payload)?;
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": clattice::VERSION,
        "defaults": {
            "angles": [0.0, 30.0],
            "angles_step": 0.1,
            "nmax": SearchCfg::default().nmax,
            "tolerance": SearchCfg::default().tolerance,
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn defaults_match_historical_tool() {
        let cmd = Cmd::try_parse_from(["clattice", "combine", "Gr", "hBN"]).unwrap();
        let Action::Combine {
            output,
            max_atoms,
            sweep,
            ..
        } = cmd.action
        else {
            panic!("expected combine");
        };
        assert_eq!(output, PathBuf::from("CoincidenceLattices.dat"));
        assert_eq!(max_atoms, 100);
        let spec = sweep.sweep();
        assert_eq!((spec.start, spec.end, spec.step), (0.0, 30.0, 0.1));
        assert_eq!(sweep.cfg(), SearchCfg::default());
    }

    #[test]
    fn search_flags_map_to_policies() {
        let cmd = Cmd::try_parse_from([
            "clattice",
            "search",
            "-a",
            "-10",
            "10",
            "-s",
            "2",
            "-N",
            "3",
            "--angle-tolerance",
            "1.5",
            "--distance",
            "coordinate-wise",
            "--range",
            "inclusive-open-n2",
            "--rotation",
            "cw",
            "--sweep-end",
            "padded",
        ])
        .unwrap();
        let Action::Search { sweep, .. } = cmd.action else {
            panic!("expected search");
        };
        let spec = sweep.sweep();
        assert_eq!(spec.start, -10.0);
        assert_eq!(spec.boundary, SweepBoundary::Padded);
        assert_eq!(spec.len(), 11);
        let cfg = sweep.cfg();
        assert_eq!(cfg.nmax, 3);
        assert_eq!(cfg.angle_tolerance, Some(1.5));
        assert_eq!(cfg.distance, DistanceTest::CoordinateWise);
        assert_eq!(cfg.range, CoefficientRange::InclusiveOpenN2);
        assert_eq!(cfg.rotation, RotationSense::Clockwise);
    }

    #[test]
    fn search_writes_blocks_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lattices.tmp");
        let out = dir.path().join("out/coincidences.tmp");
        std::fs::write(&input, "1 0\n0 1\n1 0\n0 1\n").unwrap();
        for parallel in [false, true] {
            let cmd = Cmd::try_parse_from([
                "clattice",
                "search",
                "-a",
                "0",
                "90",
                "-s",
                "45",
                "-N",
                "1",
                "-t",
                "1e-6",
            ])
            .unwrap();
            let Action::Search { mut sweep, .. } = cmd.action else {
                panic!("expected search");
            };
            sweep.parallel = parallel;
            search(&input, &out, &sweep).unwrap();
            let text = std::fs::read_to_string(&out).unwrap();
            assert!(text.starts_with("0.00\n"));
            assert!(text.contains("\n45.00\n\n90.00\n"));
            assert!(text.contains("\n0 1 1 0\n"));
        }
        assert!(dir.path().join("out/coincidences.provenance.json").exists());
    }

    #[test]
    fn combine_writes_table_export_and_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let gr = dir.path().join("Gr");
        let bn = dir.path().join("hBN");
        std::fs::write(&gr, "Gr\n2\nHexagonal\n2.467\n").unwrap();
        std::fs::write(&bn, "hBN\n2\nhexagonal\n2.504\n").unwrap();
        let output = dir.path().join("CoincidenceLattices.dat");
        let csv = dir.path().join("cells.csv");
        let cmd = Cmd::try_parse_from([
            "clattice", "combine", "Gr", "hBN", "-a", "0", "2", "-s", "1", "-N", "3", "-n", "20",
        ])
        .unwrap();
        let Action::Combine { sweep, .. } = cmd.action else {
            panic!("expected combine");
        };
        combine(&[gr, bn], &output, 20, false, Some(&csv), &sweep).unwrap();
        let table = std::fs::read_to_string(&output).unwrap();
        assert!(table.starts_with("bilayer"));
        assert!(table.contains("Gr/hBN"));
        assert!(csv.exists());
        assert!(dir.path().join("cells.provenance.json").exists());
        assert!(dir.path().join("CoincidenceLattices.provenance.json").exists());
    }

    #[test]
    fn combine_rejects_bad_parameters_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let gr = dir.path().join("Gr");
        std::fs::write(&gr, "Gr\n2\nHexagonal\n2.467\n").unwrap();
        let output = dir.path().join("table.dat");
        let cmd = Cmd::try_parse_from(["clattice", "combine", "-t", "0", "x"]).unwrap();
        let Action::Combine { sweep, .. } = cmd.action else {
            panic!("expected combine");
        };
        assert!(combine(&[gr], &output, 100, true, None, &sweep).is_err());
        assert!(!output.exists());
    }
}
