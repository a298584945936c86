//! Crystal description files.
//!
//! Format (plain text, no extension required):
//!
//! ```text
//! Gr
//! 2
//! Hexagonal
//! 2.467
//! ```
//!
//! Line 1 is the label, line 2 the number of atoms in the unit cell, line 3 the
//! Bravais lattice (case-insensitive) and line 4 its parameters:
//! `a` (square, hexagonal), `ax ay` (rectangular) or `a1 a2 gamma_deg` (oblique).

use std::fmt;
use std::path::Path;

use super::LatticeBasis;

/// The four 2D Bravais lattice families accepted in description files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BravaisKind {
    Square,
    Rectangular,
    Hexagonal,
    Oblique,
}

impl BravaisKind {
    /// Parses a lattice name, ignoring case and all whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "square" => Some(Self::Square),
            "rectangular" => Some(Self::Rectangular),
            "hexagonal" => Some(Self::Hexagonal),
            "oblique" => Some(Self::Oblique),
            _ => None,
        }
    }

    /// Number of parameters needed on line 4.
    pub fn parameter_count(self) -> usize {
        match self {
            Self::Square | Self::Hexagonal => 1,
            Self::Rectangular => 2,
            Self::Oblique => 3,
        }
    }

    /// Builds the basis from the first `parameter_count()` entries of `params`.
    pub fn basis(self, params: &[f64]) -> Result<LatticeBasis, CrystalError> {
        let needed = self.parameter_count();
        if params.len() < needed {
            return Err(CrystalError::NotEnoughParameters {
                lattice: self,
                needed,
                found: params.len(),
            });
        }
        Ok(match self {
            Self::Square => LatticeBasis::square(params[0]),
            Self::Rectangular => LatticeBasis::rectangular(params[0], params[1]),
            Self::Hexagonal => LatticeBasis::hexagonal(params[0]),
            Self::Oblique => LatticeBasis::oblique(params[0], params[1], params[2]),
        })
    }
}

impl fmt::Display for BravaisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Square => "square",
            Self::Rectangular => "rectangular",
            Self::Hexagonal => "hexagonal",
            Self::Oblique => "oblique",
        };
        f.write_str(name)
    }
}

/// A 2D crystal: label, atoms per unit cell and lattice basis.
///
/// The atomic basis itself is not modelled; only its atom count is needed for
/// supercell sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct Crystal {
    pub label: String,
    pub atoms: u32,
    pub kind: BravaisKind,
    pub basis: LatticeBasis,
}

impl Crystal {
    pub fn new(
        label: impl Into<String>,
        atoms: u32,
        kind: BravaisKind,
        params: &[f64],
    ) -> Result<Self, CrystalError> {
        Ok(Self {
            label: label.into(),
            atoms,
            kind,
            basis: kind.basis(params)?,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CrystalError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CrystalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, CrystalError> {
        let mut lines = text.lines();
        let mut next_line = |line: usize, what: &'static str| {
            lines
                .next()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .ok_or(CrystalError::MissingLine { line, what })
        };

        let label = next_line(1, "label")?.to_string();
        let atoms_raw = next_line(2, "number of atoms")?;
        let atoms = atoms_raw
            .parse::<u32>()
            .map_err(|_| CrystalError::InvalidAtoms {
                value: atoms_raw.to_string(),
            })?;
        let kind_raw = next_line(3, "Bravais lattice")?;
        let kind = BravaisKind::parse(kind_raw).ok_or_else(|| CrystalError::UnknownLattice {
            name: kind_raw.to_string(),
        })?;
        let params_raw = next_line(4, "lattice parameters")?;
        let params = params_raw
            .split_whitespace()
            .map(|tok| match tok.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(CrystalError::InvalidParameter {
                    value: tok.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            label,
            atoms,
            kind,
            basis: kind.basis(&params)?,
        })
    }
}

/// Errors raised while reading a crystal description.
#[derive(Debug)]
pub enum CrystalError {
    Io { path: String, source: std::io::Error },
    MissingLine { line: usize, what: &'static str },
    InvalidAtoms { value: String },
    UnknownLattice { name: String },
    InvalidParameter { value: String },
    NotEnoughParameters { lattice: BravaisKind, needed: usize, found: usize },
}

impl fmt::Display for CrystalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read crystal file {path}: {source}"),
            Self::MissingLine { line, what } => {
                write!(f, "line {line} ({what}) is missing or empty")
            }
            Self::InvalidAtoms { value } => write!(f, "invalid number of atoms: {value:?}"),
            Self::UnknownLattice { name } => write!(
                f,
                "invalid 2D Bravais lattice {name:?} (expected square, rectangular, hexagonal or oblique)"
            ),
            Self::InvalidParameter { value } => {
                write!(f, "invalid lattice parameter: {value:?}")
            }
            Self::NotEnoughParameters {
                lattice,
                needed,
                found,
            } => write!(
                f,
                "{lattice} lattices need {needed} parameter(s), found {found}"
            ),
        }
    }
}

impl std::error::Error for CrystalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
