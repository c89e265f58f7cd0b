//! Builds one complete schedule by repeated `select_instruction` -> `commit`
//! under machine-model legality.

use cranelift_entity::SecondaryMap;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::config::{Config, PheromoneStrategy};
use crate::cost::CostModel;
use crate::cycle_state::CycleState;
use crate::error::SchedError;
use crate::inst::{Dag, InstId};
use crate::key_helper::KeyHelper;
use crate::machine::{MachineModel, SlotOccupancy};
use crate::pheromone::PheromoneMatrix;
use crate::ready_list::{ReadyEntry, ReadyList};
use crate::schedule::{Schedule, ScheduleEntry};

/// Per-ant state for building a single schedule. Reused across ants within
/// one engine (cleared, not reallocated) in sequential mode; one instance
/// per thread in `parallel` mode.
pub struct AntConstructor<'a, M: MachineModel> {
    dag: &'a Dag,
    machine: &'a M,
    key_helper: &'a KeyHelper,
    pheromone: &'a PheromoneMatrix,
    config: &'a Config,
    /// Seed value the pheromone matrix was initialised with; used by ACS
    /// local decay.
    p0: f64,

    rng: rand::rngs::SmallRng,
    ready_list: ReadyList,
    cycle: CycleState,
    occupancy: SlotOccupancy,
    pred_scheduled: SecondaryMap<InstId, u32>,
    last_scheduled: Option<InstId>,
    scheduled_count: u32,
    waiting_on: Option<usize>,
    schedule: Schedule,

    /// ACS local decay is applied ant-locally rather than to the shared
    /// matrix, since the matrix is read-only during construction (so
    /// concurrent ants in `parallel` mode can share it without locking).
    /// Overrides are discarded when the ant finishes; only the engine's
    /// between-iteration reinforcement/decay persists into the shared
    /// matrix.
    local_overrides: FxHashMap<(Option<InstId>, InstId), f64>,
}

impl<'a, M: MachineModel> AntConstructor<'a, M> {
    pub fn new(
        dag: &'a Dag,
        machine: &'a M,
        key_helper: &'a KeyHelper,
        pheromone: &'a PheromoneMatrix,
        config: &'a Config,
        p0: f64,
        seed: u64,
    ) -> Self {
        use rand::SeedableRng;
        Self {
            dag,
            machine,
            key_helper,
            pheromone,
            config,
            p0,
            rng: rand::rngs::SmallRng::seed_from_u64(seed),
            ready_list: ReadyList::new(),
            cycle: CycleState::new(machine.issue_rate()),
            occupancy: SlotOccupancy::new(),
            pred_scheduled: SecondaryMap::new(),
            last_scheduled: None,
            scheduled_count: 0,
            waiting_on: None,
            schedule: Schedule::new(),
            local_overrides: FxHashMap::default(),
        }
    }

    fn reset(&mut self) {
        self.ready_list.clear();
        self.cycle.reset();
        self.occupancy.release_all();
        self.pred_scheduled = SecondaryMap::new();
        self.last_scheduled = None;
        self.scheduled_count = 0;
        self.waiting_on = None;
        self.schedule = Schedule::new();
        self.local_overrides.clear();
    }

    fn pheromone_at(&self, last: Option<InstId>, next: InstId) -> f64 {
        self.local_overrides
            .get(&(last, next))
            .copied()
            .unwrap_or_else(|| self.pheromone.get(last, next))
    }

    fn max_key_inv(&self) -> f64 {
        let max = self.key_helper.max_value();
        if max == 0 {
            1.0
        } else {
            1.0 / max as f64
        }
    }

    fn score_for(&self, last: Option<InstId>, next: InstId, full_key: u64) -> f64 {
        let p = self.pheromone_at(last, next);
        if self.config.heuristic_importance {
            p * (full_key as f64 * self.max_key_inv() + 1.0)
        } else {
            p
        }
    }

    /// Seeds the ready list from every zero-predecessor instruction (the
    /// DAG's roots), folding in the virtual-start seeding step described in
    /// `inst::Dag`'s doc comment, then scores them against row 0.
    fn initialize(&mut self) {
        for id in self.dag.roots() {
            let heuristics = self.dag.get(id).heuristics();
            let key = self.key_helper.compute_key(heuristics, true);
            self.ready_list.add(ReadyEntry {
                inst_id: id,
                ready_on: 0,
                heuristic_key: key,
                score: 0.0,
            });
        }
        self.rescore();
    }

    /// Recomputes every ready-list entry's score against `last_scheduled`,
    /// OR-ing in the dynamic last-use-count contribution. Required because
    /// LUC depends on which registers just became dead; recomputing from
    /// scratch is cheaper than trying to patch scores incrementally and
    /// avoids accumulating float drift across many small updates.
    fn rescore(&mut self) {
        let last = self.last_scheduled;
        for i in 0..self.ready_list.len() {
            let entry = *self.ready_list.get(i);
            let heuristics = self.dag.get(entry.inst_id).heuristics();
            let full_key = self
                .key_helper
                .apply_dynamic(entry.heuristic_key, heuristics.last_use_count);
            let score = self.score_for(last, entry.inst_id, full_key);
            self.ready_list.set_heuristic_key(i, full_key);
            self.ready_list.set_score(i, score);
        }
    }

    /// Selection rule: bias step, then tournament or roulette.
    fn select_instruction(&mut self) -> usize {
        let m = self.ready_list.len();
        if m == 1 {
            return 0;
        }

        let choose_best = if self.config.use_fixed_bias {
            (1.0 - self.config.fixed_bias / self.dag.len().max(1) as f64).max(0.0)
        } else {
            self.config.bias_ratio
        };
        if self.rng.gen::<f64>() < choose_best {
            if let Some(idx) = self.ready_list.argmax_index() {
                return idx;
            }
        }

        if self.config.use_tournament {
            let i = self.rng.gen_range(0..m);
            let j = self.rng.gen_range(0..m);
            return if self.ready_list.get(i).score >= self.ready_list.get(j).score {
                i
            } else {
                j
            };
        }

        let sum = self.ready_list.score_sum();
        if sum <= 0.0 {
            return self.rng.gen_range(0..m);
        }
        let target = self.rng.gen::<f64>() * sum;
        let mut running = 0.0;
        for (i, entry) in self.ready_list.iter().enumerate() {
            running += entry.score;
            if running >= target || (sum - running).abs() < 1e-3 {
                return i;
            }
        }
        m - 1
    }

    /// Commits the ready-list entry at `idx`: schedules it at the current
    /// cycle/slot, reserves its functional unit, and unlocks any successor
    /// whose last predecessor this was.
    fn commit(&mut self, idx: usize) {
        let entry = self.ready_list.remove_at(idx);
        let cycle = self.cycle.cycle();
        let slot = self.cycle.slot();

        self.schedule.push(ScheduleEntry {
            cycle,
            slot,
            inst: Some(entry.inst_id),
        });
        self.occupancy.reserve(self.machine.issue_type(entry.inst_id));
        self.scheduled_count += 1;

        if self.config.local_decay && self.config.pheromone_strategy == PheromoneStrategy::Acs {
            let old = self.pheromone_at(self.last_scheduled, entry.inst_id);
            let rho = self.config.decay_factor;
            let new = ((1.0 - rho) * old + rho * self.p0)
                .clamp(self.pheromone.min_p(), self.pheromone.max_p());
            self.local_overrides
                .insert((self.last_scheduled, entry.inst_id), new);
        }

        for succ in self.dag.get(entry.inst_id).successors() {
            let data = self.dag.get(succ.inst);
            let count = self.pred_scheduled[succ.inst] + 1;
            self.pred_scheduled[succ.inst] = count;
            if count == data.predecessor_count() {
                let ready_on = cycle + succ.latency;
                let key = self.key_helper.compute_key(data.heuristics(), false);
                self.ready_list.add(ReadyEntry {
                    inst_id: succ.inst,
                    ready_on,
                    heuristic_key: key,
                    score: 0.0,
                });
            }
        }

        self.last_scheduled = Some(entry.inst_id);
        self.rescore();
    }

    /// `true` if ready-list entry `idx` could issue right now: its latency
    /// has elapsed and the machine model accepts it in the current
    /// cycle/slot under the occupancy accumulated so far this cycle.
    fn is_committable(&self, idx: usize, cycle: u32, slot: u32) -> bool {
        let entry = self.ready_list.get(idx);
        entry.ready_on <= cycle && self.machine.is_legal(entry.inst_id, slot, &self.occupancy)
    }

    /// Index of any ready-list entry that is committable right now, if one
    /// exists. Used both to give a stalled ant a second ready-list entry a
    /// chance (rather than fixating on whichever one was picked last) and to
    /// tell a transient latency stall apart from a permanent legality
    /// deadlock.
    fn find_committable(&self, cycle: u32, slot: u32) -> Option<usize> {
        (0..self.ready_list.len()).find(|&i| self.is_committable(i, cycle, slot))
    }

    /// Builds one complete schedule. Returns `Ok(None)` if the ant aborted
    /// early because `incremental_rp_cost` exceeded `target_rp_cost`, and
    /// `Err(SchedError::InfeasibleRegion)` if the machine model rejects
    /// every candidate in a non-empty ready list forever (a true deadlock,
    /// not a transient stall).
    pub fn construct(
        &mut self,
        cost_model: &dyn CostModel,
        target_rp_cost: Option<f64>,
    ) -> Result<Option<Schedule>, SchedError> {
        self.reset();
        self.initialize();

        let n = self.dag.len() as u32;
        let issue_rate = self.machine.issue_rate();
        // Counts consecutive slots where at least one ready-list entry is
        // past its latency (`ready_on <= cycle`) but none is legal. Occupancy
        // resets every cycle and `MachineModel::is_legal` depends only on
        // `(inst, slot, occupancy)`, never on the cycle number itself, so if
        // this persists for a whole cycle's worth of slots the state can
        // only repeat forever -- a genuine deadlock, not a transient stall.
        let mut stalled_slots_with_due_work = 0u32;

        while self.scheduled_count < n {
            if self.ready_list.is_empty() {
                return Err(SchedError::InfeasibleRegion);
            }

            let cycle = self.cycle.cycle();
            let slot = self.cycle.slot();

            // Re-examine the ready list fresh every slot rather than
            // fixating on whichever entry was chosen last time it turned out
            // illegal: a different entry (or the same one, now that
            // occupancy or `ready_on` has changed) may be committable this
            // slot even if the previous pick never becomes so. Mirrors
            // `original_source`'s `SelectInstruction`, which is likewise
            // re-invoked fresh every iteration rather than pinned to a single
            // choice while stalled.
            let idx = match self.waiting_on {
                Some(idx) if self.is_committable(idx, cycle, slot) => idx,
                _ => self
                    .find_committable(cycle, slot)
                    .unwrap_or_else(|| self.select_instruction()),
            };

            if self.is_committable(idx, cycle, slot) {
                self.waiting_on = None;
                stalled_slots_with_due_work = 0;
                self.commit(idx);
                if let Some(target) = target_rp_cost {
                    if cost_model.incremental_rp_cost(&self.schedule) > target {
                        return Ok(None);
                    }
                }
            } else {
                self.waiting_on = Some(idx);
                self.schedule.push(ScheduleEntry {
                    cycle,
                    slot,
                    inst: None,
                });

                let any_due = self.ready_list.iter().any(|e| e.ready_on <= cycle);
                if any_due {
                    stalled_slots_with_due_work += 1;
                    if stalled_slots_with_due_work >= issue_rate {
                        return Err(SchedError::InfeasibleRegion);
                    }
                } else {
                    stalled_slots_with_due_work = 0;
                }
            }

            if self.cycle.advance() {
                self.occupancy.release_all();
            }
        }

        self.schedule.cost = cost_model.compute_cost(&self.schedule);
        self.schedule.exec_cost = cost_model.compute_exec_cost(&self.schedule);
        self.schedule.norm_spill_cost = cost_model.compute_norm_spill_cost(&self.schedule);
        Ok(Some(std::mem::replace(&mut self.schedule, Schedule::new())))
    }
}
