//! The machine model: issue width and functional-unit legality rules.
//!
//! `MachineModel` itself is immutable for the engine's whole lifetime,
//! so it can be shared read-only across concurrently-running ants in
//! `parallel` mode. Each ant instead owns a private [`SlotOccupancy`] table
//! tracking what it has reserved so far *this cycle*; legality checks take
//! that table as an explicit argument rather than the model mutating itself.

use rustc_hash::FxHashMap;

use crate::inst::{InstId, IssueType};

/// Host-supplied description of the target's issue constraints.
pub trait MachineModel {
    /// Number of instructions that may issue in a single cycle.
    fn issue_rate(&self) -> u32;

    fn issue_type(&self, inst: InstId) -> IssueType;

    /// How many instructions of `ty` may issue per cycle. Defaults to the
    /// full issue rate (i.e. the unit isn't a bottleneck) unless overridden.
    fn unit_capacity(&self, ty: IssueType) -> u32 {
        let _ = ty;
        self.issue_rate()
    }

    /// Whether `inst` may legally issue in `slot`, given what `occupancy`
    /// already holds reserved for the current cycle.
    fn is_legal(&self, inst: InstId, slot: u32, occupancy: &SlotOccupancy) -> bool {
        if slot >= self.issue_rate() {
            return false;
        }
        let ty = self.issue_type(inst);
        occupancy.used(ty) < self.unit_capacity(ty)
    }
}

/// Per-ant, per-cycle functional-unit usage. Reset on every cycle advance.
#[derive(Clone, Debug, Default)]
pub struct SlotOccupancy {
    used_this_cycle: FxHashMap<u16, u32>,
}

impl SlotOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used(&self, ty: IssueType) -> u32 {
        self.used_this_cycle.get(&ty.0).copied().unwrap_or(0)
    }

    pub fn reserve(&mut self, ty: IssueType) {
        *self.used_this_cycle.entry(ty.0).or_insert(0) += 1;
    }

    pub fn release_all(&mut self) {
        self.used_this_cycle.clear();
    }
}

/// A generic fixed-function-unit machine model: every [`IssueType`] has an
/// independent per-cycle issue limit. This is the model the bundled test
/// fixtures and the `cli` binary use; a host compiler with a richer notion
/// of legality implements [`MachineModel`] directly instead.
#[derive(Clone, Debug)]
pub struct FixedUnitMachineModel {
    issue_rate: u32,
    issue_types: FxHashMap<u32, IssueType>,
    unit_capacity: FxHashMap<u16, u32>,
}

impl FixedUnitMachineModel {
    pub fn new(issue_rate: u32) -> Self {
        Self {
            issue_rate,
            issue_types: FxHashMap::default(),
            unit_capacity: FxHashMap::default(),
        }
    }

    pub fn set_issue_type(&mut self, inst: InstId, ty: IssueType) {
        self.issue_types.insert(inst.index() as u32, ty);
    }

    pub fn set_unit_capacity(&mut self, ty: IssueType, capacity: u32) {
        self.unit_capacity.insert(ty.0, capacity);
    }
}

impl MachineModel for FixedUnitMachineModel {
    fn issue_rate(&self) -> u32 {
        self.issue_rate
    }

    fn issue_type(&self, inst: InstId) -> IssueType {
        self.issue_types
            .get(&(inst.index() as u32))
            .copied()
            .unwrap_or(IssueType(0))
    }

    fn unit_capacity(&self, ty: IssueType) -> u32 {
        self.unit_capacity
            .get(&ty.0)
            .copied()
            .unwrap_or(self.issue_rate)
    }
}
