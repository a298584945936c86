use crate::lattice::Crystal;
use crate::search::{search, CoincidenceSearch, SearchCfg, SearchError, SweepSpec};

use super::cell::{minimum_area_pair, Supercell};

/// Two crystals investigated together; `second` is the rotated one.
#[derive(Clone, Copy, Debug)]
pub struct Combination<'a> {
    pub first: &'a Crystal,
    pub second: &'a Crystal,
}

impl<'a> Combination<'a> {
    pub fn new(first: &'a Crystal, second: &'a Crystal) -> Self {
        Self { first, second }
    }

    /// `"first/second"`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.first.label, self.second.label)
    }

    /// Lazy coincidence search of the pair.
    pub fn search(
        &self,
        sweep: &SweepSpec,
        cfg: &SearchCfg,
    ) -> Result<CoincidenceSearch, SearchError> {
        search(&self.first.basis, &self.second.basis, sweep, cfg)
    }

    /// One minimum-area supercell per angle that admits one, in sweep order.
    pub fn supercells(
        &self,
        sweep: &SweepSpec,
        cfg: &SearchCfg,
    ) -> Result<Vec<Supercell>, SearchError> {
        let cells: Vec<Supercell> = self
            .search(sweep, cfg)?
            .filter_map(|block| {
                minimum_area_pair(&block.solutions)
                    .map(|pair| Supercell::from_pair(block.angle, pair, self.first, self.second))
            })
            .collect();
        tracing::info!(pair = %self.label(), supercells = cells.len(), "combination searched");
        Ok(cells)
    }
}

/// All pairs `(i, j)` with `i < j`, plus `(i, i)` when `self_combinations` is set.
pub fn combinations(crystals: &[Crystal], self_combinations: bool) -> Vec<Combination<'_>> {
    let mut out = Vec::new();
    for (i, first) in crystals.iter().enumerate() {
        let from = if self_combinations { i } else { i + 1 };
        for second in &crystals[from..] {
            out.push(Combination::new(first, second));
        }
    }
    out
}
