//! Flat-text loader for the two bases and the per-angle result sink.
//!
//! Input layout (columns of the basis matrices, whitespace separated):
//!
//! ```text
//! xA1 xA2
//! yA1 yA2
//! xB1 xB2
//! yB1 yB2
//! ```
//!
//! Output layout, one block per sampled angle:
//!
//! ```text
//! 12.00
//! 1 0 1 0
//! 0 1 0 1
//!
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Vector2;
use tempfile::NamedTempFile;

use crate::lattice::LatticeBasis;
use crate::search::{search, AngleSolutions, SearchCfg, SearchError, SweepSpec};

/// Errors while loading the eight basis numbers.
#[derive(Debug)]
pub enum LoadError {
    /// The input file does not exist.
    Missing { path: PathBuf },
    Io(io::Error),
    /// Fewer than eight numbers were present.
    Truncated { found: usize },
    /// Token at `position` (0-based) is not a finite number.
    Malformed { position: usize, token: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "lattice input {} not found", path.display()),
            Self::Io(e) => write!(f, "reading lattice input: {e}"),
            Self::Truncated { found } => {
                write!(f, "lattice input holds {found} number(s), expected 8")
            }
            Self::Malformed { position, token } => {
                write!(f, "lattice input token {position} ({token:?}) is not a finite number")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Parses the first eight numbers of `text` into bases `(A, B)`.
pub fn parse_bases(text: &str) -> Result<(LatticeBasis, LatticeBasis), LoadError> {
    let mut v = [0.0f64; 8];
    let mut found = 0;
    for (position, token) in text.split_whitespace().take(8).enumerate() {
        v[position] = match token.parse::<f64>() {
            Ok(x) if x.is_finite() => x,
            _ => {
                return Err(LoadError::Malformed {
                    position,
                    token: token.to_string(),
                })
            }
        };
        found += 1;
    }
    if found < 8 {
        return Err(LoadError::Truncated { found });
    }
    let [xa1, xa2, ya1, ya2, xb1, xb2, yb1, yb2] = v;
    Ok((
        LatticeBasis::new(Vector2::new(xa1, ya1), Vector2::new(xa2, ya2)),
        LatticeBasis::new(Vector2::new(xb1, yb1), Vector2::new(xb2, yb2)),
    ))
}

pub fn read_bases<P: AsRef<Path>>(path: P) -> Result<(LatticeBasis, LatticeBasis), LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io(e),
    })?;
    parse_bases(&text)
}

/// Writes `(A, B)` in the input layout (the producer side of `read_bases`).
pub fn write_bases<W: Write>(mut w: W, a: &LatticeBasis, b: &LatticeBasis) -> io::Result<()> {
    for basis in [a, b] {
        writeln!(w, "{:.17e} {:.17e}", basis.e1.x, basis.e2.x)?;
        writeln!(w, "{:.17e} {:.17e}", basis.e1.y, basis.e2.y)?;
    }
    Ok(())
}

/// Counts of what a sink received.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkSummary {
    pub angles: usize,
    pub solutions: usize,
}

/// Writes one angle block: header, one quadruple per line, blank separator.
pub fn write_angle_block<W: Write>(w: &mut W, block: &AngleSolutions) -> io::Result<()> {
    writeln!(w, "{:.2}", block.angle)?;
    for s in &block.solutions {
        writeln!(w, "{s}")?;
    }
    writeln!(w)
}

/// Streams blocks to `w` as they are produced.
pub fn write_solutions<W, I>(mut w: W, blocks: I) -> io::Result<SinkSummary>
where
    W: Write,
    I: IntoIterator<Item = AngleSolutions>,
{
    let mut summary = SinkSummary::default();
    for block in blocks {
        write_angle_block(&mut w, &block)?;
        summary.angles += 1;
        summary.solutions += block.solutions.len();
    }
    w.flush()?;
    Ok(summary)
}

/// Runs `write` against a temporary file next to `output` and moves it into
/// place only when `write` succeeds. On failure `output` is left untouched.
fn write_atomically<T, F>(output: &Path, write: F) -> io::Result<T>
where
    F: FnOnce(&mut BufWriter<&File>) -> io::Result<T>,
{
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut w = BufWriter::new(tmp.as_file());
        let value = write(&mut w)?;
        w.flush()?;
        value
    };
    tmp.persist(output).map_err(|e| e.error)?;
    Ok(value)
}

/// Streams blocks into `output`; a failed write leaves no file behind.
pub fn write_solutions_file<P, I>(output: P, blocks: I) -> io::Result<SinkSummary>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = AngleSolutions>,
{
    write_atomically(output.as_ref(), |w| write_solutions(w, blocks))
}

/// Errors of the file-to-file entry point.
#[derive(Debug)]
pub enum RunError {
    Load(LoadError),
    Search(SearchError),
    Output { path: PathBuf, source: io::Error },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => fmt::Display::fmt(e, f),
            Self::Search(e) => fmt::Display::fmt(e, f),
            Self::Output { path, source } => {
                write!(f, "writing results to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Search(e) => Some(e),
            Self::Output { source, .. } => Some(source),
        }
    }
}

impl From<LoadError> for RunError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<SearchError> for RunError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

/// Loads bases from `input`, runs the sweep and streams blocks to `output`.
///
/// Input and parameters are checked before `output` is created, and results
/// are moved into place only once fully written, so a failed run leaves no
/// result file behind.
pub fn search_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
) -> Result<SinkSummary, RunError> {
    let (a, b) = read_bases(input)?;
    let blocks = search(&a, &b, sweep, cfg)?;
    let output = output.as_ref();
    let out_err = |source| RunError::Output {
        path: output.to_path_buf(),
        source,
    };
    let summary = write_solutions_file(output, blocks).map_err(out_err)?;
    tracing::info!(
        angles = summary.angles,
        solutions = summary.solutions,
        output = %output.display(),
        "coincidences written"
    );
    Ok(summary)
}
