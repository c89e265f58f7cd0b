//! Cost modeling and the `should_replace` comparator that drives both the
//! per-iteration best and the global-best updates.

use crate::config::DualCostFn;
use crate::schedule::Schedule;

/// Host-supplied cost computation. The engine core never inspects register
/// contents or liveness itself -- it only asks for scalar costs over a
/// finished or in-progress [`Schedule`].
pub trait CostModel {
    fn compute_cost(&self, schedule: &Schedule) -> f64;
    /// Schedule length beyond the region's lower bound, mirroring
    /// `sched_region.h`'s `execCost` out-parameter computed alongside the
    /// total cost. Feeds `ComparisonMode::TwoPassSecond`'s first disjunct.
    fn compute_exec_cost(&self, schedule: &Schedule) -> f64;
    fn compute_norm_spill_cost(&self, schedule: &Schedule) -> f64;
    fn compute_extra_spill_cost(&self, schedule: &Schedule, dcf_fn_name: &str) -> f64;

    /// Register-pressure cost accrued so far by a schedule under
    /// construction; checked against `target_rp_cost` for early ant abort.
    fn incremental_rp_cost(&self, partial: &Schedule) -> f64;
}

/// Which half of the two-pass driver is currently running, or single-pass
/// mode.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ComparisonMode {
    SinglePass,
    TwoPassFirst,
    TwoPassSecond,
}

/// `should_replace(old, new, global)`: `true` if `new` should replace `old`
/// as the relevant best schedule.
#[allow(clippy::too_many_arguments)]
pub fn should_replace(
    old: Option<&Schedule>,
    new: Option<&Schedule>,
    global: bool,
    mode: ComparisonMode,
    dcf: DualCostFn,
    dcf_fn_name: &str,
    cost_model: &dyn CostModel,
) -> bool {
    let (old, new) = match (old, new) {
        (None, _) => return new.is_some(),
        (Some(_), None) => return false,
        (Some(old), Some(new)) => (old, new),
    };

    match mode {
        ComparisonMode::TwoPassSecond => {
            (new.exec_cost < old.exec_cost && new.norm_spill_cost <= old.norm_spill_cost)
                || new.norm_spill_cost < old.norm_spill_cost
        }
        ComparisonMode::SinglePass | ComparisonMode::TwoPassFirst => {
            let (old_primary, new_primary) = match mode {
                ComparisonMode::TwoPassFirst => (old.norm_spill_cost, new.norm_spill_cost),
                _ => (old.cost, new.cost),
            };

            if new_primary < old_primary {
                return true;
            }
            if new_primary > old_primary {
                return false;
            }

            // Tie on the primary cost: consult the dual cost function.
            match dcf {
                DualCostFn::Off => false,
                DualCostFn::GlobalOnly => {
                    if !global {
                        return false;
                    }
                    let old_extra = cost_model.compute_extra_spill_cost(old, dcf_fn_name);
                    let new_extra = cost_model.compute_extra_spill_cost(new, dcf_fn_name);
                    new_extra < old_extra
                }
                DualCostFn::GlobalAndTighten | DualCostFn::GlobalAndIteration => {
                    let old_extra = cost_model.compute_extra_spill_cost(old, dcf_fn_name);
                    let new_extra = cost_model.compute_extra_spill_cost(new, dcf_fn_name);
                    new_extra < old_extra
                }
            }
        }
    }
}
