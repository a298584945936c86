use super::*;
use crate::lattice::{BravaisKind, Crystal};
use crate::search::{CoefficientQuadruple, SearchCfg, SweepSpec};

fn q(m1: i32, m2: i32, n1: i32, n2: i32) -> CoefficientQuadruple {
    CoefficientQuadruple::new(m1, m2, n1, n2)
}

fn crystal(label: &str, atoms: u32, kind: BravaisKind, params: &[f64]) -> Crystal {
    Crystal::new(label, atoms, kind, params).unwrap()
}

#[test]
fn minimum_area_pair_prefers_first_smallest_positive() {
    let sols = [q(1, 0, 1, 0), q(2, 0, 2, 0), q(0, 1, 0, 1), q(1, 1, 1, 1)];
    assert_eq!(
        minimum_area_pair(&sols),
        Some((q(1, 0, 1, 0), q(0, 1, 0, 1)))
    );
    // Only negatively oriented or collinear pairs: nothing qualifies.
    assert_eq!(minimum_area_pair(&[q(0, 1, 0, 1), q(1, 0, 1, 0)]), None);
    assert_eq!(minimum_area_pair(&[q(1, 1, 1, 1), q(2, 2, 2, 2)]), None);
    assert_eq!(minimum_area_pair(&[]), None);
}

#[test]
fn identical_crystals_give_unit_supercell() {
    let gr = crystal("Gr", 2, BravaisKind::Hexagonal, &[2.467]);
    let cfg = SearchCfg {
        nmax: 2,
        tolerance: 1e-6,
        ..SearchCfg::default()
    };
    let cells = Combination::new(&gr, &gr)
        .supercells(&SweepSpec::single(0.0), &cfg)
        .unwrap();
    assert_eq!(cells.len(), 1);
    let c = &cells[0];
    assert_eq!(c.area_scaling, [1, 1]);
    assert_eq!(c.atoms, 4);
    assert_eq!(c.strain, [0.0, 0.0]);
    assert_eq!(c.labels, ("Gr".to_string(), "Gr".to_string()));
}

#[test]
fn strained_square_pair() {
    let a = crystal("A", 1, BravaisKind::Square, &[1.0]);
    let b = crystal("B", 1, BravaisKind::Square, &[1.01]);
    let cell = Supercell::from_pair(0.0, (q(1, 0, 1, 0), q(0, 1, 0, 1)), &a, &b);
    let expected = 0.01 / 2.01;
    assert!((cell.strain[0] - expected).abs() < 1e-12);
    assert!((cell.strain[1] - expected).abs() < 1e-12);
    assert!((cell.max_strain() - expected).abs() < 1e-12);
    assert_eq!(cell.atoms, 2);
    assert_eq!(cell.scaling_squared(), [1, 1, 1, 1]);
    assert!((cell.vector_norms[2] - 1.01).abs() < 1e-12);
}

#[test]
fn larger_supercell_counts_atoms_per_crystal() {
    let a = crystal("A", 2, BravaisKind::Square, &[1.0]);
    let b = crystal("B", 3, BravaisKind::Square, &[2.0]);
    // 2×2 cell of A against a 1×1 cell of B.
    let cell = Supercell::from_pair(0.0, (q(2, 0, 1, 0), q(0, 2, 0, 1)), &a, &b);
    assert_eq!(cell.area_scaling, [4, 1]);
    assert_eq!(cell.atoms, 4 * 2 + 3);
    assert_eq!(cell.strain, [0.0, 0.0]);
    assert!((cell.vector_scaling[0] - 2.0).abs() < 1e-12);
}

#[test]
fn graphene_on_hbn_sweep() {
    let gr = crystal("Gr", 2, BravaisKind::Hexagonal, &[2.467]);
    let bn = crystal("hBN", 2, BravaisKind::Hexagonal, &[2.504]);
    let cfg = SearchCfg {
        nmax: 5,
        tolerance: 0.02,
        ..SearchCfg::default()
    };
    let cells = Combination::new(&gr, &bn)
        .supercells(&SweepSpec::new(0.0, 30.0, 1.0), &cfg)
        .unwrap();
    assert!(!cells.is_empty());
    assert_eq!(cells[0].angle, 0.0);
    assert_eq!(cells[0].atoms, 4);
    assert!(cells.windows(2).all(|w| w[0].angle < w[1].angle));
    for c in &cells {
        assert!(c.max_strain() < cfg.tolerance);
        assert!(c.area_scaling[0] >= 1);
    }
}

#[test]
fn combination_enumeration() {
    let cs = vec![
        crystal("A", 1, BravaisKind::Square, &[1.0]),
        crystal("B", 1, BravaisKind::Square, &[2.0]),
        crystal("C", 1, BravaisKind::Square, &[3.0]),
    ];
    let labels = |v: Vec<Combination>| v.iter().map(Combination::label).collect::<Vec<_>>();
    assert_eq!(labels(combinations(&cs, false)), vec!["A/B", "A/C", "B/C"]);
    assert_eq!(
        labels(combinations(&cs, true)),
        vec!["A/A", "A/B", "A/C", "B/B", "B/C", "C/C"]
    );
    assert!(combinations(&cs[..1], false).is_empty());
}
