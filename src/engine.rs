//! Outer ACO loop: iterations of ant colonies, pheromone reinforcement/decay,
//! best-so-far tracking, warm start, and the two-pass register-pressure/ILP
//! driver.

use std::time::{Duration, Instant};

use crate::ant::AntConstructor;
use crate::config::{Config, DualCostFn, PheromoneStrategy};
use crate::cost::{should_replace, ComparisonMode, CostModel};
use crate::error::SchedError;
use crate::inst::{Dag, InstId};
use crate::key_helper::KeyHelper;
use crate::machine::MachineModel;
use crate::pheromone::PheromoneMatrix;
use crate::schedule::Schedule;
use crate::trace;

/// `MAX_DEP - MIN_DEP` bound the reinforcement deposit computed in
/// [`AcoEngine::reinforce`]; kept well inside `[min_p, max_p]` so a single
/// deposit can't by itself blow past the MAX-MIN clamp.
const MIN_DEP: f64 = 0.5;
const MAX_DEP: f64 = 3.0;

/// Per-region statistics, mirroring the reference implementation's
/// `localCmp`/`localCmpRej`/`globalCmp`/`globalCmpRej` counters.
#[derive(Copy, Clone, Debug, Default)]
pub struct EngineStats {
    pub iterations: u32,
    pub best_found_iteration: u32,
    pub local_cmp: u32,
    pub local_cmp_rej: u32,
    pub global_cmp: u32,
    pub global_cmp_rej: u32,
}

/// Why [`AcoEngine::run`] stopped.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TerminationReason {
    /// `best_sched.cost == 0`: nothing left to improve.
    Converged,
    /// `stop_iterations` consecutive iterations produced no improvement.
    NoImprovement,
    /// The wall-clock deadline passed before either of the above.
    Timeout,
}

/// Owns the pheromone matrix, the `KeyHelper`, and the reusable
/// `AntConstructor` for one region. Borrows `Dag` and `MachineModel` for its
/// whole lifetime.
pub struct AcoEngine<'a, M: MachineModel> {
    dag: &'a Dag,
    machine: &'a M,
    config: Config,
    ants_per_iteration: u32,
    key_helper: KeyHelper,
    pheromone: PheromoneMatrix,
    p0: f64,
}

impl<'a, M: MachineModel> AcoEngine<'a, M> {
    /// Builds a fresh engine for `dag`, seeding the pheromone matrix from a
    /// single heuristic-only ant (`P === 1` everywhere).
    /// `ants_per_iteration` selects which of `config`'s two colony sizes (p1
    /// or p2) this engine uses, both for the seed formula and for the main
    /// loop; the two-pass driver constructs one `AcoEngine` per pass.
    pub fn new(
        dag: &'a Dag,
        machine: &'a M,
        config: Config,
        ants_per_iteration: u32,
        cost_model: &dyn CostModel,
    ) -> Result<Self, SchedError> {
        let key_helper = KeyHelper::init_for_region(dag);
        let n = dag.len() as u32;

        let mut heuristic_only = PheromoneMatrix::new(n.max(1), 1.0, 1.0);
        heuristic_only.seed(1.0);
        let mut seed_ant =
            AntConstructor::new(dag, machine, &key_helper, &heuristic_only, &config, 1.0, config.seed);
        let h = seed_ant
            .construct(cost_model, None)?
            .map(|s| cost_model.compute_cost(&s))
            .unwrap_or(0.0);

        let p0 = match config.pheromone_strategy {
            PheromoneStrategy::Mmas => ants_per_iteration as f64 / (h + 1.0),
            PheromoneStrategy::Acs => 2.0 / (n.max(1) as f64 * (h + 1.0)),
        };

        let mut pheromone = PheromoneMatrix::new(n.max(1), config.min_p, config.max_p);
        pheromone.seed(p0);

        log::debug!(
            "aco seed: heuristic-only cost={h}, p0={p0}, strategy={:?}",
            config.pheromone_strategy
        );

        Ok(Self {
            dag,
            machine,
            config,
            ants_per_iteration,
            key_helper,
            pheromone,
            p0,
        })
    }

    /// Deposits pheromone along `schedule`'s walked edges (virtual start as
    /// `prev = None` for the first real instruction).
    fn reinforce(&mut self, schedule: &Schedule, cost: f64, sc_rel_max: f64) {
        match self.config.pheromone_strategy {
            PheromoneStrategy::Mmas => {
                let portion = cost / (sc_rel_max.max(1.0) * 1.5);
                let deposit = (1.0 - portion).max(0.0) * (MAX_DEP - MIN_DEP) + MIN_DEP;
                let mut last = None;
                for inst in schedule.instructions() {
                    self.pheromone.reinforce_edge(last, inst, deposit);
                    last = Some(inst);
                }
            }
            PheromoneStrategy::Acs => {
                let rho = self.config.decay_factor;
                let mut last = None;
                for inst in schedule.instructions() {
                    self.pheromone.blend_edge(last, inst, rho, cost);
                    last = Some(inst);
                }
            }
        }
    }

    fn decay(&mut self) {
        if self.config.pheromone_strategy == PheromoneStrategy::Mmas {
            self.pheromone.decay_all(self.config.decay_factor);
        }
    }

    /// Outer loop for a single pass. `mode` selects the primary cost
    /// `should_replace` compares on; `target_nsc` is the hard register
    /// pressure ceiling ants beyond the first in each iteration abort into
    /// (the two-pass driver's pass 2 uses this; pass 1 and single-pass mode
    /// pass `None`). `initial_schedule` is an optional warm start.
    #[cfg(not(feature = "parallel"))]
    pub fn run(
        &mut self,
        cost_model: &dyn CostModel,
        mode: ComparisonMode,
        target_nsc: Option<f64>,
        initial_schedule: Option<Schedule>,
        dag_id: &str,
    ) -> Result<(Schedule, EngineStats, TerminationReason), SchedError> {
        let deadline = Instant::now() + Duration::from_millis(self.config.deadline_ms);
        let sc_rel_max = self.dag.len().max(1) as f64;

        let mut stats = EngineStats::default();
        let mut best_sched: Option<Schedule> = initial_schedule;
        if let Some(sched) = best_sched.as_ref() {
            let cost = cost_model.compute_cost(sched);
            self.reinforce(sched, cost, sc_rel_max);
            log::debug!("aco warm start: cost={cost}");
        }

        let mut no_improv = 0u32;
        let reason = loop {
            let mut iter_best: Option<Schedule> = None;
            let mut any_ant_edges = Vec::new();

            // Scoped so the ant's borrows of `self.pheromone`/`self.config`
            // end before `self.reinforce`/`self.decay` need `&mut self`
            // below. The ant (and its ready list) is reused across the
            // `ants_per_iteration` ants of this one iteration, but rebuilt
            // fresh every iteration rather than across the whole run, since
            // the matrix it borrows is mutated between iterations.
            {
                let mut ant = AntConstructor::new(
                    self.dag,
                    self.machine,
                    &self.key_helper,
                    &self.pheromone,
                    &self.config,
                    self.p0,
                    self.config.seed ^ stats.iterations as u64,
                );

                for ant_idx in 0..self.ants_per_iteration {
                    let target = if ant_idx > 0 { target_nsc } else { None };
                    let candidate = match ant.construct(cost_model, target) {
                        Ok(Some(mut s)) => {
                            s.cost = cost_model.compute_cost(&s);
                            s.exec_cost = cost_model.compute_exec_cost(&s);
                            s.norm_spill_cost = cost_model.compute_norm_spill_cost(&s);
                            Some(s)
                        }
                        Ok(None) => None,
                        // Legality is structural: if the machine model deadlocks
                        // one ant on this dag, it deadlocks every ant the same
                        // way, so this is a region-wide failure, not a per-ant one.
                        Err(e) => return Err(e),
                    };

                    if self.config.aco_trace {
                        if let Some(s) = candidate.as_ref() {
                            any_ant_edges.extend(trace::schedule_edges(s));
                        }
                    }

                    stats.local_cmp += 1;
                    if should_replace(
                        iter_best.as_ref(),
                        candidate.as_ref(),
                        false,
                        mode,
                        self.config.dual_cost_fn,
                        dcf_fn_name(self.config.dual_cost_fn),
                        cost_model,
                    ) {
                        iter_best = candidate;
                    } else {
                        stats.local_cmp_rej += 1;
                    }

                    if Instant::now() >= deadline {
                        break;
                    }
                }
            }

            let first_pass = matches!(mode, ComparisonMode::SinglePass | ComparisonMode::TwoPassFirst);
            let within_target = match (&iter_best, target_nsc) {
                (Some(s), Some(t)) => s.norm_spill_cost <= t,
                _ => true,
            };
            if let Some(sched) = iter_best.as_ref() {
                if first_pass || within_target {
                    let cost = cost_model.compute_cost(sched);
                    self.reinforce(sched, cost, sc_rel_max);
                }
            }
            self.decay();

            if self.config.aco_trace {
                let mut dot = String::new();
                if trace::write_pheromone_graph(
                    &mut dot,
                    &self.pheromone,
                    self.dag.len() as u32,
                    iter_best.as_ref(),
                    best_sched.as_ref(),
                    &any_ant_edges,
                )
                .is_ok()
                    && self.config.dbg_regions
                {
                    let path = format!("{dag_id}@iter{}.dot", stats.iterations);
                    if let Err(e) = std::fs::write(&path, &dot) {
                        log::warn!("failed to write pheromone trace {path}: {e}");
                    }
                }
            }

            stats.global_cmp += 1;
            if should_replace(
                best_sched.as_ref(),
                iter_best.as_ref(),
                true,
                mode,
                self.config.dual_cost_fn,
                dcf_fn_name(self.config.dual_cost_fn),
                cost_model,
            ) {
                best_sched = iter_best;
                stats.best_found_iteration = stats.iterations;
                no_improv = 0;
                if best_sched.as_ref().map(|s| s.cost == 0.0).unwrap_or(false) {
                    break TerminationReason::Converged;
                }
            } else {
                stats.global_cmp_rej += 1;
                no_improv += 1;
                if no_improv > self.config.stop_iterations {
                    break TerminationReason::NoImprovement;
                }
            }

            stats.iterations += 1;
            if Instant::now() >= deadline {
                break TerminationReason::Timeout;
            }
        };

        let best = best_sched.ok_or(SchedError::InfeasibleRegion)?;
        log::info!(
            "aco run finished: reason={reason:?}, iterations={}, cost={}, stats={stats:?}",
            stats.iterations,
            best.cost
        );
        Ok((best, stats, reason))
    }

    /// Parallel mode: the `ants_per_iteration` ants of one iteration run
    /// concurrently via `std::thread::scope`, each with its own
    /// `AntConstructor` (ready list, cycle state, predecessor counters). The
    /// pheromone matrix is shared read-only across the scope; reinforcement
    /// and decay only ever run on the calling thread, after every spawned
    /// ant has joined, so construction and mutation never overlap in time
    /// and no locking is needed on the matrix itself.
    #[cfg(feature = "parallel")]
    pub fn run(
        &mut self,
        cost_model: &(dyn CostModel + Sync),
        mode: ComparisonMode,
        target_nsc: Option<f64>,
        initial_schedule: Option<Schedule>,
        dag_id: &str,
    ) -> Result<(Schedule, EngineStats, TerminationReason), SchedError>
    where
        M: Sync,
    {
        let deadline = Instant::now() + Duration::from_millis(self.config.deadline_ms);
        let sc_rel_max = self.dag.len().max(1) as f64;

        let mut stats = EngineStats::default();
        let mut best_sched: Option<Schedule> = initial_schedule;
        if let Some(sched) = best_sched.as_ref() {
            let cost = cost_model.compute_cost(sched);
            self.reinforce(sched, cost, sc_rel_max);
            log::debug!("aco warm start: cost={cost}");
        }

        let mut no_improv = 0u32;
        let reason = loop {
            let mut iter_best: Option<Schedule> = None;
            let mut any_ant_edges = Vec::new();

            let dag = self.dag;
            let machine = self.machine;
            let key_helper = &self.key_helper;
            let pheromone = &self.pheromone;
            let config = &self.config;
            let p0 = self.p0;
            let iter_seed = self.config.seed ^ stats.iterations as u64;

            let raw: Vec<Result<Option<Schedule>, SchedError>> = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..self.ants_per_iteration)
                    .map(|ant_idx| {
                        let target = if ant_idx > 0 { target_nsc } else { None };
                        scope.spawn(move || {
                            let mut ant = AntConstructor::new(
                                dag,
                                machine,
                                key_helper,
                                pheromone,
                                config,
                                p0,
                                iter_seed ^ ant_idx as u64,
                            );
                            ant.construct(cost_model, target)
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().expect("ant thread panicked"))
                    .collect()
            });

            for result in raw {
                // Legality is structural: if the machine model deadlocks one
                // ant on this dag, it deadlocks every ant the same way, so
                // this is a region-wide failure, not a per-ant one.
                let candidate = match result? {
                    Some(mut s) => {
                        s.cost = cost_model.compute_cost(&s);
                        s.exec_cost = cost_model.compute_exec_cost(&s);
                        s.norm_spill_cost = cost_model.compute_norm_spill_cost(&s);
                        Some(s)
                    }
                    None => None,
                };

                if self.config.aco_trace {
                    if let Some(s) = candidate.as_ref() {
                        any_ant_edges.extend(trace::schedule_edges(s));
                    }
                }

                stats.local_cmp += 1;
                if should_replace(
                    iter_best.as_ref(),
                    candidate.as_ref(),
                    false,
                    mode,
                    self.config.dual_cost_fn,
                    dcf_fn_name(self.config.dual_cost_fn),
                    cost_model,
                ) {
                    iter_best = candidate;
                } else {
                    stats.local_cmp_rej += 1;
                }
            }

            let first_pass = matches!(mode, ComparisonMode::SinglePass | ComparisonMode::TwoPassFirst);
            let within_target = match (&iter_best, target_nsc) {
                (Some(s), Some(t)) => s.norm_spill_cost <= t,
                _ => true,
            };
            if let Some(sched) = iter_best.as_ref() {
                if first_pass || within_target {
                    let cost = cost_model.compute_cost(sched);
                    self.reinforce(sched, cost, sc_rel_max);
                }
            }
            self.decay();

            if self.config.aco_trace {
                let mut dot = String::new();
                if trace::write_pheromone_graph(
                    &mut dot,
                    &self.pheromone,
                    self.dag.len() as u32,
                    iter_best.as_ref(),
                    best_sched.as_ref(),
                    &any_ant_edges,
                )
                .is_ok()
                    && self.config.dbg_regions
                {
                    let path = format!("{dag_id}@iter{}.dot", stats.iterations);
                    if let Err(e) = std::fs::write(&path, &dot) {
                        log::warn!("failed to write pheromone trace {path}: {e}");
                    }
                }
            }

            stats.global_cmp += 1;
            if should_replace(
                best_sched.as_ref(),
                iter_best.as_ref(),
                true,
                mode,
                self.config.dual_cost_fn,
                dcf_fn_name(self.config.dual_cost_fn),
                cost_model,
            ) {
                best_sched = iter_best;
                stats.best_found_iteration = stats.iterations;
                no_improv = 0;
                if best_sched.as_ref().map(|s| s.cost == 0.0).unwrap_or(false) {
                    break TerminationReason::Converged;
                }
            } else {
                stats.global_cmp_rej += 1;
                no_improv += 1;
                if no_improv > self.config.stop_iterations {
                    break TerminationReason::NoImprovement;
                }
            }

            stats.iterations += 1;
            if Instant::now() >= deadline {
                break TerminationReason::Timeout;
            }
        };

        let best = best_sched.ok_or(SchedError::InfeasibleRegion)?;
        log::info!(
            "aco run finished (parallel): reason={reason:?}, iterations={}, cost={}, stats={stats:?}",
            stats.iterations,
            best.cost
        );
        Ok((best, stats, reason))
    }
}

fn dcf_fn_name(dcf: DualCostFn) -> &'static str {
    match dcf {
        DualCostFn::Off => "",
        DualCostFn::GlobalOnly => "dcf",
        DualCostFn::GlobalAndTighten => "dcf_tighten",
        DualCostFn::GlobalAndIteration => "dcf_iteration",
    }
}

/// Two-pass driver: pass 1 minimises register pressure; pass 2 reruns with pass 1's
/// `norm_spill_cost` as a hard ceiling, optimising schedule length within it.
/// The pheromone matrix is reseeded between passes (a fresh `AcoEngine`).
#[cfg(not(feature = "parallel"))]
pub fn run_two_pass<M: MachineModel>(
    dag: &Dag,
    machine: &M,
    cost_model: &dyn CostModel,
    config: Config,
    initial_schedule: Option<Schedule>,
    dag_id: &str,
) -> Result<(Schedule, EngineStats, TerminationReason), SchedError> {
    let mut pass1 = AcoEngine::new(dag, machine, config, config.ants_per_iteration_p1, cost_model)?;
    let (pass1_best, pass1_stats, pass1_reason) = pass1.run(
        cost_model,
        ComparisonMode::TwoPassFirst,
        None,
        initial_schedule,
        dag_id,
    )?;
    log::info!(
        "two-pass: pass 1 done ({pass1_reason:?}), norm_spill_cost={}",
        pass1_best.norm_spill_cost
    );

    let target_nsc = pass1_best.norm_spill_cost;
    let mut pass2 = AcoEngine::new(dag, machine, config, config.ants_per_iteration_p2, cost_model)?;
    let (pass2_best, pass2_stats, pass2_reason) = pass2.run(
        cost_model,
        ComparisonMode::TwoPassSecond,
        Some(target_nsc),
        Some(pass1_best),
        dag_id,
    )?;

    let stats = EngineStats {
        iterations: pass1_stats.iterations + pass2_stats.iterations,
        best_found_iteration: pass2_stats.best_found_iteration,
        local_cmp: pass1_stats.local_cmp + pass2_stats.local_cmp,
        local_cmp_rej: pass1_stats.local_cmp_rej + pass2_stats.local_cmp_rej,
        global_cmp: pass1_stats.global_cmp + pass2_stats.global_cmp,
        global_cmp_rej: pass1_stats.global_cmp_rej + pass2_stats.global_cmp_rej,
    };
    Ok((pass2_best, stats, pass2_reason))
}

/// Parallel-mode counterpart of [`run_two_pass`] (see [`AcoEngine::run`]'s
/// `parallel`-feature overload).
#[cfg(feature = "parallel")]
pub fn run_two_pass<M: MachineModel + Sync>(
    dag: &Dag,
    machine: &M,
    cost_model: &(dyn CostModel + Sync),
    config: Config,
    initial_schedule: Option<Schedule>,
    dag_id: &str,
) -> Result<(Schedule, EngineStats, TerminationReason), SchedError> {
    let mut pass1 = AcoEngine::new(dag, machine, config, config.ants_per_iteration_p1, cost_model)?;
    let (pass1_best, pass1_stats, pass1_reason) = pass1.run(
        cost_model,
        ComparisonMode::TwoPassFirst,
        None,
        initial_schedule,
        dag_id,
    )?;
    log::info!(
        "two-pass: pass 1 done ({pass1_reason:?}), norm_spill_cost={}",
        pass1_best.norm_spill_cost
    );

    let target_nsc = pass1_best.norm_spill_cost;
    let mut pass2 = AcoEngine::new(dag, machine, config, config.ants_per_iteration_p2, cost_model)?;
    let (pass2_best, pass2_stats, pass2_reason) = pass2.run(
        cost_model,
        ComparisonMode::TwoPassSecond,
        Some(target_nsc),
        Some(pass1_best),
        dag_id,
    )?;

    let stats = EngineStats {
        iterations: pass1_stats.iterations + pass2_stats.iterations,
        best_found_iteration: pass2_stats.best_found_iteration,
        local_cmp: pass1_stats.local_cmp + pass2_stats.local_cmp,
        local_cmp_rej: pass1_stats.local_cmp_rej + pass2_stats.local_cmp_rej,
        global_cmp: pass1_stats.global_cmp + pass2_stats.global_cmp,
        global_cmp_rej: pass1_stats.global_cmp_rej + pass2_stats.global_cmp_rej,
    };
    Ok((pass2_best, stats, pass2_reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::{HeuristicInputs, InstructionData, IssueType, Successor};
    use crate::machine::FixedUnitMachineModel;

    struct LengthCost;
    impl CostModel for LengthCost {
        fn compute_cost(&self, schedule: &Schedule) -> f64 {
            schedule.sched_length() as f64
        }
        fn compute_exec_cost(&self, schedule: &Schedule) -> f64 {
            schedule.sched_length() as f64
        }
        fn compute_norm_spill_cost(&self, _schedule: &Schedule) -> f64 {
            0.0
        }
        fn compute_extra_spill_cost(&self, _schedule: &Schedule, _dcf_fn_name: &str) -> f64 {
            0.0
        }
        fn incremental_rp_cost(&self, _partial: &Schedule) -> f64 {
            0.0
        }
    }

    fn chain_dag() -> Dag {
        let mut dag = Dag::new();
        for i in 0..4u32 {
            let successors = if i < 3 {
                vec![Successor {
                    inst: InstId::from_u32(i + 1),
                    latency: 1,
                }]
            } else {
                vec![]
            };
            dag.push(InstructionData {
                issue_type: IssueType(0),
                successors,
                predecessor_count: if i == 0 { 0 } else { 1 },
                heuristics: HeuristicInputs::default(),
            });
        }
        dag
    }

    fn diamond_dag() -> Dag {
        let mut dag = Dag::new();
        let succ = |id: u32, latency: u32| Successor {
            inst: InstId::from_u32(id),
            latency,
        };
        dag.push(InstructionData {
            issue_type: IssueType(0),
            successors: vec![succ(1, 1), succ(2, 1)],
            predecessor_count: 0,
            heuristics: HeuristicInputs::default(),
        });
        dag.push(InstructionData {
            issue_type: IssueType(0),
            successors: vec![succ(3, 1)],
            predecessor_count: 1,
            heuristics: HeuristicInputs::default(),
        });
        dag.push(InstructionData {
            issue_type: IssueType(0),
            successors: vec![succ(3, 1)],
            predecessor_count: 1,
            heuristics: HeuristicInputs::default(),
        });
        dag.push(InstructionData {
            issue_type: IssueType(0),
            successors: vec![],
            predecessor_count: 2,
            heuristics: HeuristicInputs::default(),
        });
        dag
    }

    #[test]
    fn chain_converges_to_stall_free_schedule() {
        let dag = chain_dag();
        let machine = FixedUnitMachineModel::new(1);
        let cost_model = LengthCost;
        let mut config = Config::default();
        config.deadline_ms = 2_000;
        config.stop_iterations = 5;

        let mut engine = AcoEngine::new(&dag, &machine, config, config.ants_per_iteration_p1, &cost_model)
            .unwrap();
        let (best, _stats, reason) = engine
            .run(&cost_model, ComparisonMode::SinglePass, None, None, "test")
            .unwrap();

        assert_eq!(reason, TerminationReason::Converged);
        let ids: Vec<_> = best.instructions().map(|i| i.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(best.cost, 4.0);
    }

    #[test]
    fn diamond_schedules_independent_branches_same_cycle() {
        let dag = diamond_dag();
        let machine = FixedUnitMachineModel::new(2);
        let cost_model = LengthCost;
        let mut config = Config::default();
        config.deadline_ms = 2_000;
        config.stop_iterations = 10;

        let mut engine = AcoEngine::new(&dag, &machine, config, config.ants_per_iteration_p1, &cost_model)
            .unwrap();
        let (best, ..) = engine
            .run(&cost_model, ComparisonMode::SinglePass, None, None, "test")
            .unwrap();

        assert_eq!(best.sched_length(), 3);
        let last = InstId::from_u32(3);
        let last_entry = best
            .entries()
            .iter()
            .find(|e| e.inst == Some(last))
            .unwrap();
        assert_eq!(last_entry.cycle, 2);
    }

    #[test]
    fn warm_start_schedule_is_not_regressed() {
        let dag = chain_dag();
        let machine = FixedUnitMachineModel::new(1);
        let cost_model = LengthCost;
        let mut config = Config::default();
        config.deadline_ms = 2_000;
        config.stop_iterations = 3;

        let mut warm = Schedule::new();
        for i in 0..4u32 {
            warm.push(crate::schedule::ScheduleEntry {
                cycle: i,
                slot: 0,
                inst: Some(InstId::from_u32(i)),
            });
        }
        warm.cost = cost_model.compute_cost(&warm);

        let mut engine = AcoEngine::new(&dag, &machine, config, config.ants_per_iteration_p1, &cost_model)
            .unwrap();
        let (best, ..) = engine
            .run(
                &cost_model,
                ComparisonMode::SinglePass,
                None,
                Some(warm.clone()),
                "test",
            )
            .unwrap();

        assert!(best.cost <= warm.cost);
    }
}
