//! Coincidence supercells of graphene on hexagonal boron nitride.
//!
//! Sweeps 0–30° in 0.5° steps with Nmax = 7 and 2 % tolerance, then prints the
//! minimum-area supercell found at each angle (atoms and strain per vector).
//!
//! Run: `cargo run --release -p clattice --example graphene_hbn`

use std::time::Instant;

use clattice::lattice::{BravaisKind, Crystal};
use clattice::search::{SearchCfg, SweepSpec};
use clattice::supercell::Combination;

fn main() {
    let gr = Crystal::new("Gr", 2, BravaisKind::Hexagonal, &[2.467]).expect("graphene");
    let bn = Crystal::new("hBN", 2, BravaisKind::Hexagonal, &[2.504]).expect("hBN");
    let sweep = SweepSpec::new(0.0, 30.0, 0.5);
    let cfg = SearchCfg::default();

    let start = Instant::now();
    let cells = Combination::new(&gr, &bn)
        .supercells(&sweep, &cfg)
        .expect("valid parameters");
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    for c in cells.iter().filter(|c| c.atoms <= 400) {
        println!(
            "angle={:5.1} atoms={:4} strain=({:+.2}%, {:+.2}%)",
            c.angle,
            c.atoms,
            100.0 * c.strain[0],
            100.0 * c.strain[1]
        );
    }
    println!(
        "samples={} supercells={} elapsed_ms={:.1}",
        sweep.len(),
        cells.len(),
        elapsed_ms
    );
}
