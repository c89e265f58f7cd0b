//! The scheduler's output: a cycle-by-cycle instruction ordering plus the
//! cost figures the comparator and pheromone update need.

use crate::inst::InstId;

/// One issue-width slot of the output. `inst = None` marks a stall: the slot
/// went unused because nothing in the ready list was both ready and legal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub cycle: u32,
    pub slot: u32,
    pub inst: Option<InstId>,
}

/// A complete schedule for one region, plus the cost figures computed once
/// construction finishes.
#[derive(Clone, Debug)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    /// Total cost as scored by the active `CostModel`; what the comparator
    /// primarily sorts on outside two-pass mode.
    pub cost: f64,
    /// Schedule length beyond the DAG's lower bound.
    pub exec_cost: f64,
    /// Integral register-pressure cost over the configured cost function.
    pub spill_cost: f64,
    /// `spill_cost` minus the region's lower bound; what two-pass mode
    /// targets and compares against `target_nsc`.
    pub norm_spill_cost: f64,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cost: 0.0,
            exec_cost: 0.0,
            spill_cost: 0.0,
            norm_spill_cost: 0.0,
        }
    }

    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Number of issue slots in the schedule, including stalls.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instructions in program order, stalls filtered out.
    pub fn instructions(&self) -> impl Iterator<Item = InstId> + '_ {
        self.entries.iter().filter_map(|e| e.inst)
    }

    /// Cycle of the final occupied slot, or `0` for an empty schedule.
    pub fn sched_length(&self) -> u32 {
        self.entries.last().map(|e| e.cycle + 1).unwrap_or(0)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
