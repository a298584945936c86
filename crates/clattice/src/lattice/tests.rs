use super::*;
use nalgebra::{matrix, vector};

#[test]
fn hexagonal_basis_has_sixty_degrees() {
    let b = LatticeBasis::hexagonal(2.467);
    let cos = b.e1.dot(&b.e2) / (b.e1.norm() * b.e2.norm());
    assert!((cos - 0.5).abs() < 1e-12);
    assert!((b.e2.norm() - 2.467).abs() < 1e-12);
    let expected_area = 2.467f64.powi(2) * 3f64.sqrt() / 2.0;
    assert!((b.cell_area() - expected_area).abs() < 1e-12);
}

#[test]
fn columns_roundtrip_and_points() {
    let m = matrix![1.0, 0.5; 0.0, 2.0];
    let b = LatticeBasis::from_columns(m);
    assert_eq!(b.e1, vector![1.0, 0.0]);
    assert_eq!(b.e2, vector![0.5, 2.0]);
    assert_eq!(b.matrix(), m);
    let p = b.point(2, -1);
    assert!((p - vector![1.5, -2.0]).norm() < 1e-12);
}

#[test]
fn rotation_senses_are_inverse() {
    let th = 0.3;
    let ccw = RotationSense::CounterClockwise.matrix(th);
    let cw = RotationSense::Clockwise.matrix(th);
    assert!((ccw * cw - nalgebra::Matrix2::identity()).norm() < 1e-12);
    // Counter-clockwise quarter turn sends x̂ to ŷ.
    let q = RotationSense::CounterClockwise.matrix(std::f64::consts::FRAC_PI_2);
    assert!((q * vector![1.0, 0.0] - vector![0.0, 1.0]).norm() < 1e-12);
}

#[test]
fn full_turn_reproduces_points() {
    let b = LatticeBasis::oblique(1.3, 0.7, 73.0);
    let r0 = b.rotated(&RotationSense::CounterClockwise.matrix(0.0));
    let r360 = b.rotated(&RotationSense::CounterClockwise.matrix(360f64.to_radians()));
    for n1 in -3..=3 {
        for n2 in -3..=3 {
            assert!((r0.point(n1, n2) - r360.point(n1, n2)).norm() < 1e-12);
        }
    }
}

#[test]
fn parse_crystal_file() {
    let c = Crystal::parse("Gr\n2\nHexagonal\n2.467\n").unwrap();
    assert_eq!(c.label, "Gr");
    assert_eq!(c.atoms, 2);
    assert_eq!(c.kind, BravaisKind::Hexagonal);
    assert_eq!(c.basis, LatticeBasis::hexagonal(2.467));

    let o = Crystal::parse("P\n4\n  Ob lique \n3.3  4.4 100\n").unwrap();
    assert_eq!(o.kind, BravaisKind::Oblique);
    assert!((o.basis.e2.norm() - 4.4).abs() < 1e-12);
}

#[test]
fn parse_crystal_errors() {
    assert!(matches!(
        Crystal::parse("Gr\n"),
        Err(CrystalError::MissingLine { line: 2, .. })
    ));
    assert!(matches!(
        Crystal::parse("Gr\ntwo\nhexagonal\n2.4"),
        Err(CrystalError::InvalidAtoms { .. })
    ));
    assert!(matches!(
        Crystal::parse("Gr\n2\ntriclinic\n2.4"),
        Err(CrystalError::UnknownLattice { .. })
    ));
    assert!(matches!(
        Crystal::parse("Gr\n2\nrectangular\n2.4"),
        Err(CrystalError::NotEnoughParameters {
            lattice: BravaisKind::Rectangular,
            needed: 2,
            found: 1
        })
    ));
    assert!(matches!(
        Crystal::parse("Gr\n2\nsquare\nabc"),
        Err(CrystalError::InvalidParameter { .. })
    ));
}

#[test]
fn crystal_from_missing_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Crystal::from_path(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CrystalError::Io { .. }));
    assert!(err.to_string().contains("nope"));
}
