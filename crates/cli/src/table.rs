//! Two-line matrix notation for supercells:
//!
//! ```text
//! bilayer             [  m1   m1']   [  n1   n1']   angle (deg)    N     e (%)
//!                     [  m2   m2']   [  n2   n2']
//! Gr/hBN              [   1     0]   [   1     0]   0.0            4      0.76
//!                     [   0     1]   [   0     1]                         0.76
//! ```

use std::io::{self, Write};

use clattice::api::Supercell;

pub const DEFAULT_TITLE: &str = "bilayer";

const LABEL: usize = 20;
const M_COL: usize = 15;
const N_COL: usize = 15;
const ANGLE_COL: usize = 15;
const ATOMS_COL: usize = 6;

fn pair(a: i32, b: i32) -> String {
    format!("[{a:4}  {b:4}]")
}

/// Percent strain with a blank in place of the `+` sign.
fn percent(strain: f64) -> String {
    let p = 100.0 * strain;
    if p.is_sign_negative() && p != 0.0 {
        format!("{p:.2}")
    } else {
        format!(" {p:.2}")
    }
}

fn label(s: &Supercell) -> String {
    // Always leave one blank after the label, even when it overflows the column.
    format!("{:<w$} ", format!("{}/{}", s.labels.0, s.labels.1), w = LABEL - 1)
}

fn emit<W: Write>(w: &mut W, line: String) -> io::Result<()> {
    writeln!(w, "{}", line.trim_end())
}

/// Writes the header and every supercell with at most `max_atoms` atoms.
///
/// Returns the number of supercells written.
pub fn write_matrix_table<W: Write>(
    mut w: W,
    title: &str,
    cells: &[Supercell],
    max_atoms: u64,
) -> io::Result<usize> {
    emit(
        &mut w,
        format!(
            "{title:<LABEL$}{:<M_COL$}{:<N_COL$}{:<ANGLE_COL$}{:<ATOMS_COL$}{}",
            "[  m1   m1']", "[  n1   n1']", "angle (deg)", "N", "e (%)"
        ),
    )?;
    emit(
        &mut w,
        format!("{:<LABEL$}{:<M_COL$}{}", "", "[  m2   m2']", "[  n2   n2']"),
    )?;

    let mut rows = 0;
    for s in cells.iter().filter(|s| s.atoms <= max_atoms) {
        let (p, q) = s.solutions;
        emit(
            &mut w,
            format!(
                "{}{:<M_COL$}{:<N_COL$}{:<ANGLE_COL$}{:<ATOMS_COL$}{}",
                label(s),
                pair(p.m1, q.m1),
                pair(p.n1, q.n1),
                format!("{:.1}", s.angle),
                s.atoms,
                percent(s.strain[0]),
            ),
        )?;
        emit(
            &mut w,
            format!(
                "{:<LABEL$}{:<M_COL$}{:<N_COL$}{:<w$}{}",
                "",
                pair(p.m2, q.m2),
                pair(p.n2, q.n2),
                "",
                percent(s.strain[1]),
                w = ANGLE_COL + ATOMS_COL,
            ),
        )?;
        writeln!(w)?;
        rows += 1;
    }
    w.flush()?;
    Ok(rows)
}
