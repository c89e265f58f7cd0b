//! Property-based invariants: schedule legality, `ReadyList` bookkeeping,
//! pheromone clamping, key-packing bounds, and determinism given a fixed
//! seed/config/DAG.

use std::collections::HashSet;

use proptest::prelude::*;

use aco_sched::{
    AcoEngine, ComparisonMode, Config, CostModel, Dag, FixedUnitMachineModel, HeuristicInputs,
    InstId, InstructionData, IssueType, MachineModel, Schedule, Successor,
};
use aco_sched::key_helper::KeyHelper;
use aco_sched::pheromone::PheromoneMatrix;
use aco_sched::ready_list::{ReadyEntry, ReadyList};

struct LengthOnlyCostModel;

impl CostModel for LengthOnlyCostModel {
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

/// Builds a random DAG over `n` instructions where every edge goes from a
/// lower index to a higher one, guaranteeing acyclicity.
fn random_dag(n: usize, edge_bits: &[bool], latencies: &[u32]) -> Dag {
    let mut dag = Dag::new();
    let mut pred_count = vec![0u32; n];
    let mut successors_by_src: Vec<Vec<Successor>> = vec![Vec::new(); n];
    let mut bit_idx = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let wants_edge = edge_bits.get(bit_idx).copied().unwrap_or(false);
            bit_idx += 1;
            if wants_edge {
                let latency = latencies.get(bit_idx % latencies.len().max(1)).copied().unwrap_or(1).max(1);
                successors_by_src[i].push(Successor {
                    inst: InstId::from_u32(j as u32),
                    latency,
                });
                pred_count[j] += 1;
            }
        }
    }
    for i in 0..n {
        dag.push(InstructionData {
            issue_type: IssueType(0),
            successors: std::mem::take(&mut successors_by_src[i]),
            predecessor_count: pred_count[i],
            heuristics: HeuristicInputs::default(),
        });
    }
    dag
}

fn run_small(dag: &Dag, issue_rate: u32, seed: u64, stop_iterations: u32) -> Schedule {
    let machine = FixedUnitMachineModel::new(issue_rate);
    let cost_model = LengthOnlyCostModel;
    let mut config = Config::default();
    config.seed = seed;
    config.deadline_ms = 2_000;
    config.stop_iterations = stop_iterations;
    let mut engine =
        AcoEngine::new(dag, &machine, config, config.ants_per_iteration_p1, &cost_model).unwrap();
    engine
        .run(&cost_model, ComparisonMode::SinglePass, None, None, "prop")
        .unwrap()
        .0
}

fn assert_schedule_is_legal(dag: &Dag, machine: &FixedUnitMachineModel, schedule: &Schedule) {
    let n = dag.len();

    let mut seen: HashSet<u32> = HashSet::new();
    for id in schedule.instructions() {
        assert!(seen.insert(id.index() as u32), "instruction scheduled twice");
    }
    assert_eq!(seen.len(), n, "every instruction must appear exactly once");

    let mut cycle_of = vec![None; n];
    for entry in schedule.entries() {
        if let Some(inst) = entry.inst {
            cycle_of[inst.index()] = Some(entry.cycle);
        }
    }

    for (id, data) in dag.iter() {
        let producer_cycle = cycle_of[id.index()].expect("producer must be scheduled");
        for succ in &data.successors {
            let consumer_cycle = cycle_of[succ.inst.index()].expect("consumer must be scheduled");
            assert!(
                consumer_cycle >= producer_cycle + succ.latency,
                "dependence violated: producer at {producer_cycle}, consumer at {consumer_cycle}, latency {}",
                succ.latency
            );
        }
    }

    let mut per_cycle: std::collections::HashMap<u32, u32> = std::collections::HashMap::new();
    for entry in schedule.entries() {
        if entry.inst.is_some() {
            *per_cycle.entry(entry.cycle).or_insert(0) += 1;
        }
    }
    for (_, count) in per_cycle {
        assert!(count <= machine.issue_rate(), "issue rate exceeded in one cycle");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every schedule the engine returns is a legal total order: each
    /// instruction placed exactly once, dependence latencies respected, and
    /// issue-rate never exceeded in any cycle.
    #[test]
    fn schedules_are_always_legal(
        n in 2usize..7,
        edge_bits in proptest::collection::vec(any::<bool>(), 0..21),
        latencies in proptest::collection::vec(1u32..4, 1..5),
        issue_rate in 1u32..3,
        seed in any::<u64>(),
    ) {
        let dag = random_dag(n, &edge_bits, &latencies);
        let machine = FixedUnitMachineModel::new(issue_rate);
        let best = run_small(&dag, issue_rate, seed, 3);
        assert_schedule_is_legal(&dag, &machine, &best);
    }

    /// `ReadyList::score_sum` tracks the sum of live entries' scores through
    /// any sequence of adds and swap-removes.
    #[test]
    fn ready_list_score_sum_matches_entries(
        scores in proptest::collection::vec(0.0f64..100.0, 0..20),
        removals in proptest::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut list = ReadyList::new();
        let mut model: Vec<f64> = Vec::new();
        for (i, score) in scores.iter().enumerate() {
            list.add(ReadyEntry {
                inst_id: InstId::from_u32(i as u32),
                ready_on: 0,
                heuristic_key: 0,
                score: *score,
            });
            model.push(*score);

            if removals.get(i).copied().unwrap_or(false) && !model.is_empty() {
                let idx = i % model.len();
                list.remove_at(idx);
                model.swap_remove(idx);
            }

            let expected: f64 = model.iter().sum();
            assert!((list.score_sum() - expected).abs() < 1e-6);
            assert_eq!(list.len(), model.len());
        }
    }

    /// Pheromone entries never leave `[min_p, max_p]` across any sequence of
    /// reinforcements and decays.
    #[test]
    fn pheromone_stays_clamped(
        deposits in proptest::collection::vec(0.0f64..5.0, 1..50),
        decay_factor in 0.01f64..0.5,
    ) {
        let mut m = PheromoneMatrix::new(5, 1.0, 8.0);
        m.seed(1.0);
        let i0 = InstId::from_u32(0);
        let i1 = InstId::from_u32(1);
        for deposit in deposits {
            m.decay_all(decay_factor);
            m.reinforce_edge(Some(i0), i1, deposit);
            for v in m.values() {
                assert!(v >= m.min_p() && v <= m.max_p());
            }
        }
    }

    /// A packed heuristic key never exceeds the region's declared maximum.
    #[test]
    fn key_helper_bounds_hold(
        cp in proptest::collection::vec(0u32..1000, 1..10),
        succ in proptest::collection::vec(0u32..1000, 1..10),
        luc in proptest::collection::vec(0u32..1000, 1..10),
    ) {
        let len = cp.len().min(succ.len()).min(luc.len());
        let mut dag = Dag::new();
        for i in 0..len {
            dag.push(InstructionData {
                issue_type: IssueType(0),
                successors: vec![],
                predecessor_count: 0,
                heuristics: HeuristicInputs {
                    critical_path_len: cp[i],
                    num_successors: succ[i],
                    last_use_count: luc[i],
                },
            });
        }
        let helper = KeyHelper::init_for_region(&dag);
        for (_, data) in dag.iter() {
            let key = helper.compute_key(data.heuristics, true);
            assert!(key <= helper.max_value());
        }
    }

    /// Running the same DAG through the same seed and config twice produces
    /// byte-identical schedules: the search has no hidden nondeterminism.
    #[test]
    fn same_seed_and_config_is_deterministic(
        n in 2usize..6,
        edge_bits in proptest::collection::vec(any::<bool>(), 0..15),
        latencies in proptest::collection::vec(1u32..4, 1..5),
        issue_rate in 1u32..3,
        seed in any::<u64>(),
    ) {
        let dag = random_dag(n, &edge_bits, &latencies);
        let first = run_small(&dag, issue_rate, seed, 3);
        let second = run_small(&dag, issue_rate, seed, 3);
        assert_eq!(first.entries(), second.entries());
        assert_eq!(first.cost, second.cost);
    }
}

#[test]
fn ready_list_clear_then_refill_is_idempotent() {
    let mut list = ReadyList::new();
    list.add(ReadyEntry {
        inst_id: InstId::from_u32(0),
        ready_on: 0,
        heuristic_key: 0,
        score: 5.0,
    });
    list.remove_at(0);
    assert!(list.is_empty());
    assert_eq!(list.score_sum(), 0.0);

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.score_sum(), 0.0);

    list.add(ReadyEntry {
        inst_id: InstId::from_u32(1),
        ready_on: 0,
        heuristic_key: 0,
        score: 2.0,
    });
    assert_eq!(list.score_sum(), 2.0);
}

#[test]
fn roulette_selection_is_fair_over_many_draws() {
    // Two entries with scores (1, 3): over many fixed-weight roulette draws
    // the selection frequency should approach (0.25, 0.75).
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut list = ReadyList::new();
    list.add(ReadyEntry {
        inst_id: InstId::from_u32(0),
        ready_on: 0,
        heuristic_key: 0,
        score: 1.0,
    });
    list.add(ReadyEntry {
        inst_id: InstId::from_u32(1),
        ready_on: 0,
        heuristic_key: 0,
        score: 3.0,
    });

    let mut rng = StdRng::seed_from_u64(42);
    let draws = 20_000;
    let mut picked_second = 0u32;
    for _ in 0..draws {
        let roll = rng.gen_range(0.0..list.score_sum());
        let mut acc = 0.0;
        let mut chosen = 0;
        for (i, entry) in list.iter().enumerate() {
            acc += entry.score;
            if roll < acc {
                chosen = i;
                break;
            }
        }
        if chosen == 1 {
            picked_second += 1;
        }
    }

    let frac = picked_second as f64 / draws as f64;
    assert!((frac - 0.75).abs() < 0.02, "roulette frequency drifted: {frac}");
}
