//! Ant-colony instruction scheduler.
//!
//! Given a data-dependence DAG for a single straight-line code region and a
//! machine model describing issue width, functional units and latencies, this
//! crate searches for a cycle-by-cycle instruction ordering that minimizes a
//! weighted combination of schedule length and register-pressure (spill)
//! cost. The search is driven by Ant Colony Optimization: a population of
//! constructive "ants" repeatedly build complete schedules guided by a
//! pheromone table that is reinforced and decayed between iterations.
//!
//! The crate does not itself extract regions from a larger program, perform
//! register allocation, or decide when to invoke the scheduler -- it consumes
//! a [`Dag`](inst::Dag) and [`MachineModel`](machine::MachineModel) from a
//! host compiler and hands back the best [`Schedule`](schedule::Schedule) it
//! found within the configured budget.

pub mod bitset;
pub mod config;
pub mod cost;
pub mod cycle_state;
pub mod error;
pub mod inst;
pub mod key_helper;
pub mod machine;
pub mod pheromone;
pub mod ready_list;
pub mod schedule;
pub mod trace;

mod ant;
mod engine;

pub use ant::AntConstructor;
pub use bitset::{BitSet, WeightedBitSet};
pub use config::{Config, DualCostFn, PheromoneStrategy};
pub use cost::{ComparisonMode, CostModel};
pub use engine::{run_two_pass, AcoEngine, EngineStats, TerminationReason};
pub use error::SchedError;
pub use inst::{Dag, HeuristicInputs, InstId, Instruction, InstructionData, IssueType, Successor};
pub use machine::{FixedUnitMachineModel, MachineModel};
pub use schedule::{Schedule, ScheduleEntry};

/// Virtual predecessor row used to index the pheromone matrix before any real
/// instruction has been scheduled. Row `0` of the dense `(n+1) x n` matrix.
pub(crate) const VIRTUAL_START_ROW: u32 = 0;
