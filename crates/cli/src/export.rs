use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use clattice::api::Supercell;
use polars::prelude::*;

/// One row per supercell; strains in percent.
pub fn supercell_frame(cells: &[Supercell]) -> PolarsResult<DataFrame> {
    let ints = |f: fn(&Supercell) -> i32| cells.iter().map(f).collect::<Vec<i32>>();
    let floats = |f: fn(&Supercell) -> f64| cells.iter().map(f).collect::<Vec<f64>>();
    df!(
        "system" => cells.iter().map(|c| format!("{}/{}", c.labels.0, c.labels.1)).collect::<Vec<_>>(),
        "angle_deg" => floats(|c| c.angle),
        "m1" => ints(|c| c.solutions.0.m1),
        "m2" => ints(|c| c.solutions.0.m2),
        "n1" => ints(|c| c.solutions.0.n1),
        "n2" => ints(|c| c.solutions.0.n2),
        "m1_prime" => ints(|c| c.solutions.1.m1),
        "m2_prime" => ints(|c| c.solutions.1.m2),
        "n1_prime" => ints(|c| c.solutions.1.n1),
        "n2_prime" => ints(|c| c.solutions.1.n2),
        "area_a" => cells.iter().map(|c| c.area_scaling[0]).collect::<Vec<i64>>(),
        "area_b" => cells.iter().map(|c| c.area_scaling[1]).collect::<Vec<i64>>(),
        "atoms" => cells.iter().map(|c| c.atoms).collect::<Vec<u64>>(),
        "strain1_pct" => floats(|c| 100.0 * c.strain[0]),
        "strain2_pct" => floats(|c| 100.0 * c.strain[1]),
    )
}

/// Parquet for `.parquet`, CSV with header otherwise.
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(file).finish(df)?;
        }
        _ => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
    }
    tracing::info!(
        rows = df.height(),
        cols = df.width(),
        path = %path.display(),
        "supercells exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clattice::api::{BravaisKind, Combination, Crystal, SearchCfg, SweepSpec};
    use tempfile::tempdir;

    fn cells() -> Vec<Supercell> {
        let gr = Crystal::new("Gr", 2, BravaisKind::Hexagonal, &[2.467]).unwrap();
        let bn = Crystal::new("hBN", 2, BravaisKind::Hexagonal, &[2.504]).unwrap();
        let cfg = SearchCfg {
            nmax: 3,
            ..SearchCfg::default()
        };
        Combination::new(&gr, &bn)
            .supercells(&SweepSpec::new(0.0, 2.0, 1.0), &cfg)
            .unwrap()
    }

    #[test]
    fn frame_has_one_row_per_supercell() {
        let cells = cells();
        assert!(!cells.is_empty());
        let df = supercell_frame(&cells).unwrap();
        assert_eq!(df.height(), cells.len());
        assert_eq!(df.width(), 15);
        let atoms = df.column("atoms").unwrap().u64().unwrap();
        assert_eq!(atoms.get(0), Some(cells[0].atoms));
    }

    #[test]
    fn csv_export_reads_back() {
        let cells = cells();
        let dir = tempdir().unwrap();
        let path = dir.path().join("cells.csv");
        let mut df = supercell_frame(&cells).unwrap();
        write_frame(&mut df, &path).unwrap();
        let back = LazyCsvReader::new(&path)
            .with_infer_schema_length(Some(100))
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(back.shape(), (cells.len(), 15));
        let system = back.column("system").unwrap().str().unwrap();
        assert_eq!(system.get(0), Some("Gr/hBN"));
    }

    #[test]
    fn parquet_export_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cells.parquet");
        let mut df = supercell_frame(&cells()).unwrap();
        write_frame(&mut df, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");
    }
}
