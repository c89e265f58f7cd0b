//! The data-dependence DAG the scheduler consumes.
//!
//! Instructions live in an index-addressed [`PrimaryMap`] and are referred to
//! everywhere else in the crate by [`InstId`] alone -- there are no
//! back-pointers.

use cranelift_entity::{entity_impl, PrimaryMap};

/// Index of an instruction within a [`Dag`]. Cheap to copy, ordered, and
/// usable directly as a row/column index into the pheromone matrix.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct InstId(u32);
entity_impl!(InstId, "inst");

/// Which functional unit an instruction needs to issue. Opaque to the
/// scheduler core; only the host's [`crate::MachineModel`] interprets it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct IssueType(pub u16);

/// A dependence edge: `latency` cycles must elapse between the producer
/// issuing and the consumer becoming ready to issue.
#[derive(Copy, Clone, Debug)]
pub struct Successor {
    pub inst: InstId,
    pub latency: u32,
}

/// Per-instruction inputs to [`crate::key_helper::KeyHelper`]. `last_use_count`
/// is dynamic -- it changes as sibling instructions are scheduled -- the rest
/// are static properties of the DAG.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeuristicInputs {
    pub critical_path_len: u32,
    pub num_successors: u32,
    pub last_use_count: u32,
}

/// Everything the scheduler core needs to know about one instruction.
pub trait Instruction {
    fn issue_type(&self) -> IssueType;
    fn successors(&self) -> &[Successor];
    fn predecessor_count(&self) -> u32;
    fn heuristics(&self) -> HeuristicInputs;
}

#[derive(Clone, Debug)]
pub struct InstructionData {
    pub issue_type: IssueType,
    pub successors: Vec<Successor>,
    pub predecessor_count: u32,
    pub heuristics: HeuristicInputs,
}

impl Instruction for InstructionData {
    fn issue_type(&self) -> IssueType {
        self.issue_type
    }
    fn successors(&self) -> &[Successor] {
        &self.successors
    }
    fn predecessor_count(&self) -> u32 {
        self.predecessor_count
    }
    fn heuristics(&self) -> HeuristicInputs {
        self.heuristics
    }
}

/// The data-dependence DAG for a single straight-line code region.
///
/// Invariants: acyclic; every instruction with `predecessor_count() == 0` is
/// schedulable from cycle 0 -- these are the DAG's "roots". Rather than
/// materializing a separate artificial source instruction, this crate folds
/// the artificial root into the algorithm's initial condition: the pheromone
/// matrix's row 0 already represents "nothing scheduled yet" (see
/// [`crate::pheromone::PheromoneMatrix`]), so zero-predecessor instructions
/// are seeded directly into the ready list at `ready_on = 0` instead of being
/// unlocked by committing a zero-cost virtual instruction first. This keeps
/// `Schedule`'s output exactly `n` real instructions long (plus stalls), with
/// no synthetic entry to filter back out.
#[derive(Clone, Debug, Default)]
pub struct Dag {
    instructions: PrimaryMap<InstId, InstructionData>,
}

impl Dag {
    pub fn new() -> Self {
        Self {
            instructions: PrimaryMap::new(),
        }
    }

    pub fn push(&mut self, data: InstructionData) -> InstId {
        self.instructions.push(data)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, id: InstId) -> &InstructionData {
        &self.instructions[id]
    }

    pub fn ids(&self) -> impl Iterator<Item = InstId> + '_ {
        self.instructions.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstId, &InstructionData)> + '_ {
        self.instructions.iter()
    }

    /// Instructions with no predecessors: schedulable from cycle 0.
    pub fn roots(&self) -> impl Iterator<Item = InstId> + '_ {
        self.instructions
            .iter()
            .filter(|(_, data)| data.predecessor_count == 0)
            .map(|(id, _)| id)
    }
}
