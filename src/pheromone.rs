//! Dense `(n+1) x n` pheromone matrix.
//!
//! Row `0` is the virtual "nothing scheduled yet" state; row `i + 1`
//! represents "instruction `i` was scheduled last". Column `j` is the
//! candidate successor. The layout is dense rather than sparse-on-legal-edges:
//! cache locality matters far more than the wasted entries for unreachable
//! transitions cost.

use crate::inst::InstId;
use crate::VIRTUAL_START_ROW;

#[derive(Clone, Debug)]
pub struct PheromoneMatrix {
    n: u32,
    min_p: f64,
    max_p: f64,
    values: Vec<f64>,
}

fn row_of(last: Option<InstId>) -> u32 {
    match last {
        None => VIRTUAL_START_ROW,
        Some(id) => id.index() as u32 + 1,
    }
}

impl PheromoneMatrix {
    /// A dense matrix over `n` instructions, every entry initialised to
    /// `min_p`. Call [`PheromoneMatrix::seed`] afterwards to install the
    /// heuristic-only seed value before the first iteration.
    pub fn new(n: u32, min_p: f64, max_p: f64) -> Self {
        let rows = (n + 1) as usize;
        let cols = n as usize;
        Self {
            n,
            min_p,
            max_p,
            values: vec![min_p; rows * cols],
        }
    }

    fn index(&self, row: u32, col: u32) -> usize {
        debug_assert!(row <= self.n);
        debug_assert!(col < self.n);
        (row as usize) * (self.n as usize) + (col as usize)
    }

    /// Sets every entry to `value` (clamped into `[min_p, max_p]`), as done
    /// once at engine construction from the heuristic-only ant's cost.
    pub fn seed(&mut self, value: f64) {
        let v = value.clamp(self.min_p, self.max_p);
        for e in self.values.iter_mut() {
            *e = v;
        }
    }

    pub fn get(&self, last: Option<InstId>, next: InstId) -> f64 {
        let idx = self.index(row_of(last), next.index() as u32);
        self.values[idx]
    }

    fn get_mut(&mut self, last: Option<InstId>, next: InstId) -> &mut f64 {
        let idx = self.index(row_of(last), next.index() as u32);
        &mut self.values[idx]
    }

    /// MMAS-style reinforcement: adds `deposit` to the edge then clamps.
    pub fn reinforce_edge(&mut self, last: Option<InstId>, next: InstId, deposit: f64) {
        let min_p = self.min_p;
        let max_p = self.max_p;
        let e = self.get_mut(last, next);
        *e = (*e + deposit).clamp(min_p, max_p);
    }

    /// ACS-style reinforcement: blends toward `1 / (cost + 1)` by `rho`.
    pub fn blend_edge(&mut self, last: Option<InstId>, next: InstId, rho: f64, cost: f64) {
        let min_p = self.min_p;
        let max_p = self.max_p;
        let target = 1.0 / (cost + 1.0);
        let e = self.get_mut(last, next);
        *e = ((1.0 - rho) * *e + rho * target).clamp(min_p, max_p);
    }

    /// ACS local decay, applied inline by the ant on each commit.
    pub fn local_decay(&mut self, last: Option<InstId>, next: InstId, rho_local: f64, p0: f64) {
        let min_p = self.min_p;
        let max_p = self.max_p;
        let e = self.get_mut(last, next);
        *e = ((1.0 - rho_local) * *e + rho_local * p0).clamp(min_p, max_p);
    }

    /// MMAS global decay applied to every entry after reinforcement.
    pub fn decay_all(&mut self, rho: f64) {
        let min_p = self.min_p;
        let max_p = self.max_p;
        for e in self.values.iter_mut() {
            *e = ((1.0 - rho) * *e).clamp(min_p, max_p);
        }
    }

    pub fn min_p(&self) -> f64 {
        self.min_p
    }

    pub fn max_p(&self) -> f64 {
        self.max_p
    }

    /// Iterates every stored entry, for invariant checks.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
