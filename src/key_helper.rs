//! Packs a prioritised tuple of per-instruction metrics into a single
//! comparable integer key.
//!
//! Fields are laid out most-significant-first in priority order, so that
//! numeric `>` on the packed key agrees with lexicographic priority order on
//! the underlying tuple. `last_use_count` is **dynamic**: its value changes
//! as sibling instructions are scheduled, so [`KeyHelper::compute_key`] can
//! omit it (`include_dynamic = false`) and [`KeyHelper::apply_dynamic`] ORs
//! it in later without requiring the whole key to be recomputed.

use crate::inst::{Dag, HeuristicInputs};

#[derive(Copy, Clone, Debug)]
struct FieldLayout {
    width: u32,
    offset: u32,
}

/// Bits needed to represent `v` (0 for `v == 0`, matching "width 0 is absent").
fn bits_needed(v: u32) -> u32 {
    32 - v.leading_zeros()
}

#[derive(Clone, Debug)]
pub struct KeyHelper {
    critical_path: FieldLayout,
    num_successors: FieldLayout,
    last_use_count: FieldLayout,
    max_value: u64,
}

impl KeyHelper {
    /// Inspects every instruction in `dag` to determine the minimal bit
    /// width needed for each priority field, then assigns contiguous bit
    /// fields packed MSB-first in priority order: critical-path length,
    /// number of successors, last-use count.
    pub fn init_for_region(dag: &Dag) -> Self {
        let mut max_cp = 0u32;
        let mut max_succ = 0u32;
        let mut max_luc = 0u32;
        for (_, data) in dag.iter() {
            let h = data.heuristics;
            max_cp = max_cp.max(h.critical_path_len);
            max_succ = max_succ.max(h.num_successors);
            max_luc = max_luc.max(h.last_use_count);
        }

        let w_cp = bits_needed(max_cp);
        let w_succ = bits_needed(max_succ);
        let w_luc = bits_needed(max_luc);
        let total = w_cp + w_succ + w_luc;

        let mut offset = total;
        offset -= w_cp;
        let critical_path = FieldLayout {
            width: w_cp,
            offset,
        };
        offset -= w_succ;
        let num_successors = FieldLayout {
            width: w_succ,
            offset,
        };
        offset -= w_luc;
        let last_use_count = FieldLayout {
            width: w_luc,
            offset,
        };

        let max_value = if total == 0 {
            0
        } else {
            (1u64 << total) - 1
        };

        Self {
            critical_path,
            num_successors,
            last_use_count,
            max_value,
        }
    }

    fn pack_field(layout: FieldLayout, value: u32) -> u64 {
        if layout.width == 0 {
            return 0;
        }
        let mask = (1u64 << layout.width) - 1;
        ((value as u64) & mask) << layout.offset
    }

    /// Packs `inst`'s static fields (and, if `include_dynamic`, its current
    /// `last_use_count`) into a key. With `include_dynamic = false` the
    /// dynamic field's bits are left zero; callers OR them in later via
    /// [`KeyHelper::apply_dynamic`].
    pub fn compute_key(&self, heuristics: HeuristicInputs, include_dynamic: bool) -> u64 {
        let mut key = Self::pack_field(self.critical_path, heuristics.critical_path_len)
            | Self::pack_field(self.num_successors, heuristics.num_successors);
        if include_dynamic {
            key |= Self::pack_field(self.last_use_count, heuristics.last_use_count);
        }
        key
    }

    /// ORs the dynamic last-use-count contribution into a key previously
    /// computed with `include_dynamic = false`.
    pub fn apply_dynamic(&self, key: u64, last_use_count: u32) -> u64 {
        key | Self::pack_field(self.last_use_count, last_use_count)
    }

    /// Maximum representable key for this region. `0` in the degenerate case
    /// where every field is width-0; callers substitute `1` before dividing.
    pub fn max_value(&self) -> u64 {
        self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::{InstructionData, IssueType};

    fn dag_with(heuristics: Vec<HeuristicInputs>) -> Dag {
        let mut dag = Dag::new();
        for h in heuristics {
            dag.push(InstructionData {
                issue_type: IssueType(0),
                successors: vec![],
                predecessor_count: 0,
                heuristics: h,
            });
        }
        dag
    }

    #[test]
    fn key_bound_invariant_holds() {
        let dag = dag_with(vec![
            HeuristicInputs {
                critical_path_len: 7,
                num_successors: 3,
                last_use_count: 1,
            },
            HeuristicInputs {
                critical_path_len: 2,
                num_successors: 9,
                last_use_count: 4,
            },
        ]);
        let helper = KeyHelper::init_for_region(&dag);
        for (_, data) in dag.iter() {
            let key = helper.compute_key(data.heuristics, true);
            assert!(key <= helper.max_value());
        }
    }

    #[test]
    fn dynamic_field_omitted_then_applied() {
        let dag = dag_with(vec![HeuristicInputs {
            critical_path_len: 1,
            num_successors: 1,
            last_use_count: 5,
        }]);
        let helper = KeyHelper::init_for_region(&dag);
        let h = dag.iter().next().unwrap().1.heuristics;

        let static_key = helper.compute_key(h, false);
        let full_key = helper.compute_key(h, true);
        assert_ne!(static_key, full_key);

        let patched = helper.apply_dynamic(static_key, h.last_use_count);
        assert_eq!(patched, full_key);
    }

    #[test]
    fn degenerate_region_has_zero_max() {
        let dag = dag_with(vec![HeuristicInputs::default()]);
        let helper = KeyHelper::init_for_region(&dag);
        assert_eq!(helper.max_value(), 0);
    }
}
