//! Stand-in CLI for the host compiler this crate is normally embedded in:
//! loads a `Config` (TOML file + flag overrides) and a tiny textual DAG
//! description, runs the ACO engine, and prints the resulting schedule.
//!
//! Region extraction, register allocation, and everything else the wider
//! compiler is responsible for is not this binary's job -- it exists so the
//! `config-file` feature has something to exercise end to end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use aco_sched::{
    run_two_pass, AcoEngine, ComparisonMode, Config, CostModel, Dag, DualCostFn,
    FixedUnitMachineModel, InstId, InstructionData, IssueType, Schedule, Successor,
};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "aco-sched", version, about = "Ant-colony instruction scheduler")]
struct Args {
    /// Path to a region description (TOML, see `RegionFile`). A small
    /// built-in diamond DAG is scheduled if omitted.
    region: Option<PathBuf>,

    /// Path to a `Config` TOML file; CLI flags below override individual
    /// fields on top of it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    deadline_ms: Option<u64>,
    #[arg(long)]
    stop_iterations: Option<u32>,
    #[arg(long)]
    ants_p1: Option<u32>,
    #[arg(long)]
    ants_p2: Option<u32>,
    #[arg(long)]
    two_pass: bool,
    #[arg(long)]
    trace: bool,

    /// Tiebreaker strategy, mirroring the original's `-dual-cost-fn` flag:
    /// one of `off`, `global_only`, `global_and_tighten`, `global_and_iteration`.
    #[arg(long)]
    dual_cost_fn: Option<String>,
}

/// On-disk region format. Indices are implied by array position;
/// `predecessor_count` is derived from `successors`, not stored, so the file
/// can't desync the two.
#[derive(Deserialize)]
struct RegionFile {
    issue_rate: u32,
    inst: Vec<RegionInst>,
}

#[derive(Deserialize)]
struct RegionInst {
    #[serde(default)]
    issue_type: u16,
    #[serde(default)]
    successors: Vec<(u32, u32)>,
}

fn load_region(path: &PathBuf) -> Result<(Dag, FixedUnitMachineModel)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading region file {}", path.display()))?;
    let region: RegionFile =
        toml::from_str(&text).with_context(|| format!("parsing region file {}", path.display()))?;

    let n = region.inst.len();
    let mut pred_count = vec![0u32; n];
    for inst in &region.inst {
        for &(target, _) in &inst.successors {
            anyhow::ensure!((target as usize) < n, "successor index {target} out of range");
            pred_count[target as usize] += 1;
        }
    }

    let mut dag = Dag::new();
    let mut machine = FixedUnitMachineModel::new(region.issue_rate);
    for (i, inst) in region.inst.iter().enumerate() {
        let id = dag.push(InstructionData {
            issue_type: IssueType(inst.issue_type),
            successors: inst
                .successors
                .iter()
                .map(|&(target, latency)| Successor {
                    inst: InstId::from_u32(target),
                    latency,
                })
                .collect(),
            predecessor_count: pred_count[i],
            heuristics: Default::default(),
        });
        machine.set_issue_type(id, IssueType(inst.issue_type));
    }
    Ok((dag, machine))
}

/// Demo region used when no `region` path is given: the diamond from the
/// spec's end-to-end scenarios (`0 -> {1,2} -> 3`, issue rate 2, latency 1).
fn demo_region() -> (Dag, FixedUnitMachineModel) {
    let mut dag = Dag::new();
    let succ = |id: u32| Successor {
        inst: InstId::from_u32(id),
        latency: 1,
    };
    dag.push(InstructionData {
        issue_type: IssueType(0),
        successors: vec![succ(1), succ(2)],
        predecessor_count: 0,
        heuristics: Default::default(),
    });
    dag.push(InstructionData {
        issue_type: IssueType(0),
        successors: vec![succ(3)],
        predecessor_count: 1,
        heuristics: Default::default(),
    });
    dag.push(InstructionData {
        issue_type: IssueType(0),
        successors: vec![succ(3)],
        predecessor_count: 1,
        heuristics: Default::default(),
    });
    dag.push(InstructionData {
        issue_type: IssueType(0),
        successors: vec![],
        predecessor_count: 2,
        heuristics: Default::default(),
    });
    (dag, FixedUnitMachineModel::new(2))
}

/// No register-pressure model is wired up by this demo binary -- simulated
/// register allocation lives in the host compiler, not here -- so cost is
/// schedule length alone and the spill-related hooks are no-ops.
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

fn apply_overrides(mut config: Config, args: &Args) -> Result<Config> {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(deadline_ms) = args.deadline_ms {
        config.deadline_ms = deadline_ms;
    }
    if let Some(stop_iterations) = args.stop_iterations {
        config.stop_iterations = stop_iterations;
    }
    if let Some(ants_p1) = args.ants_p1 {
        config.ants_per_iteration_p1 = ants_p1;
    }
    if let Some(ants_p2) = args.ants_p2 {
        config.ants_per_iteration_p2 = ants_p2;
    }
    if args.two_pass {
        config.use_two_pass = true;
    }
    if args.trace {
        config.aco_trace = true;
        config.dbg_regions = true;
    }
    if let Some(dcf) = &args.dual_cost_fn {
        config.dual_cost_fn = DualCostFn::parse(dcf).context("parsing --dual-cost-fn")?;
    }
    Ok(config)
}

fn print_schedule(schedule: &Schedule) {
    for entry in schedule.entries() {
        match entry.inst {
            Some(inst) => println!("cycle={:<4} slot={:<2} inst=i{}", entry.cycle, entry.slot, inst.index()),
            None => println!("cycle={:<4} slot={:<2} STALL", entry.cycle, entry.slot),
        }
    }
    println!(
        "-- cost={:.3} exec_cost={:.3} norm_spill_cost={:.3} sched_length={}",
        schedule.cost,
        schedule.exec_cost,
        schedule.norm_spill_cost,
        schedule.sched_length()
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_toml_file(path)
            .with_context(|| format!("loading config file {}", path.display()))?,
        None => Config::default(),
    };
    let config = apply_overrides(config, &args)?;

    let (dag, machine) = match &args.region {
        Some(path) => load_region(path)?,
        None => demo_region(),
    };
    let cost_model = LengthOnlyCostModel;

    let (best, stats, reason) = if config.use_two_pass {
        run_two_pass(&dag, &machine, &cost_model, config, None, "cli")
    } else {
        let mut engine = AcoEngine::new(&dag, &machine, config, config.ants_per_iteration_p1, &cost_model)?;
        engine.run(&cost_model, ComparisonMode::SinglePass, None, None, "cli")
    }
    .context("ACO search failed")?;

    print_schedule(&best);
    println!(
        "termination={reason:?} iterations={} best_found_iteration={}",
        stats.iterations, stats.best_found_iteration
    );

    Ok(())
}
