use crate::integer_cross;
use crate::lattice::Crystal;
use crate::search::CoefficientQuadruple;

/// The pair of solutions with the smallest `m × m' ≥ 1`; ties keep the first pair found.
///
/// Pairs are `(solutions[i], solutions[j])` with `i < j`, so the orientation of
/// the pair follows the order of `solutions`.
pub fn minimum_area_pair(
    solutions: &[CoefficientQuadruple],
) -> Option<(CoefficientQuadruple, CoefficientQuadruple)> {
    let mut best: Option<(i64, (CoefficientQuadruple, CoefficientQuadruple))> = None;
    for (i, s) in solutions.iter().enumerate() {
        for t in &solutions[i + 1..] {
            let area = integer_cross(s.m(), t.m());
            if area >= 1 && best.as_ref().map_or(true, |(b, _)| area < *b) {
                best = Some((area, (*s, *t)));
            }
        }
    }
    best.map(|(_, pair)| pair)
}

/// A coincidence supercell of two crystals at one rotation angle.
#[derive(Clone, Debug, PartialEq)]
pub struct Supercell {
    pub angle: f64,
    pub labels: (String, String),
    /// `(m1, m2, n1, n2)` and `(m1', m2', n1', n2')`.
    pub solutions: (CoefficientQuadruple, CoefficientQuadruple),
    /// `[m × m', n × n']`: supercell area in units of each unit cell (signed).
    pub area_scaling: [i64; 2],
    /// `[|m·A|, |m'·A|, |n·B|, |n'·B|]`.
    pub vector_norms: [f64; 4],
    /// `vector_norms` divided by `[|a1|, |a2|, |b1|, |b2|]`.
    pub vector_scaling: [f64; 4],
    pub atoms: u64,
    /// `(|n·B| − |m·A|) / (|n·B| + |m·A|)` for the first and second vector.
    pub strain: [f64; 2],
}

impl Supercell {
    pub fn from_pair(
        angle: f64,
        pair: (CoefficientQuadruple, CoefficientQuadruple),
        first: &Crystal,
        second: &Crystal,
    ) -> Self {
        let (s, t) = pair;
        let a = &first.basis;
        let b = &second.basis;
        let area_scaling = [integer_cross(s.m(), t.m()), integer_cross(s.n(), t.n())];
        // Norms are rotation invariant, so B is used unrotated.
        let vector_norms = [
            a.point(s.m1, s.m2).norm(),
            a.point(t.m1, t.m2).norm(),
            b.point(s.n1, s.n2).norm(),
            b.point(t.n1, t.n2).norm(),
        ];
        let units = [a.e1.norm(), a.e2.norm(), b.e1.norm(), b.e2.norm()];
        let vector_scaling = std::array::from_fn(|k| vector_norms[k] / units[k]);
        let atoms = area_scaling[0].unsigned_abs() * u64::from(first.atoms)
            + area_scaling[1].unsigned_abs() * u64::from(second.atoms);
        let strain_of = |na: f64, nb: f64| (nb - na) / (nb + na);
        Self {
            angle,
            labels: (first.label.clone(), second.label.clone()),
            solutions: pair,
            area_scaling,
            vector_norms,
            vector_scaling,
            atoms,
            strain: [
                strain_of(vector_norms[0], vector_norms[2]),
                strain_of(vector_norms[1], vector_norms[3]),
            ],
        }
    }

    /// Largest absolute strain of the two supercell vectors.
    pub fn max_strain(&self) -> f64 {
        self.strain[0].abs().max(self.strain[1].abs())
    }

    /// Squared scaling rounded to integers, as used by Wood notation.
    pub fn scaling_squared(&self) -> [i64; 4] {
        self.vector_scaling.map(|x| (x * x).round() as i64)
    }
}
