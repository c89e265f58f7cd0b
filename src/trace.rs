//! Per-iteration GraphViz `.dot` export of the pheromone graph, gated behind
//! `Config::aco_trace`/`Config::dbg_regions`.
//!
//! Edges are colour-coded: cyan if walked by both the best-so-far and
//! iteration-best schedules, green if iteration-best only, blue if
//! best-so-far only, red if any ant walked it this iteration, black
//! otherwise.

use std::fmt::Write as _;

use crate::inst::InstId;
use crate::pheromone::PheromoneMatrix;
use crate::schedule::Schedule;

/// Walked `(prev, next)` edges of `schedule` in program order, virtual start
/// as `None`. Exposed so the engine can accumulate "any ant walked this edge"
/// sets across a whole iteration, not just for the two schedules this module
/// renders itself.
pub fn schedule_edges(schedule: &Schedule) -> Vec<(Option<InstId>, InstId)> {
    let mut edges = Vec::new();
    let mut last = None;
    for inst in schedule.instructions() {
        edges.push((last, inst));
        last = Some(inst);
    }
    edges
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum EdgeColor {
    Cyan,
    Green,
    Blue,
    Red,
    Black,
}

impl EdgeColor {
    fn as_str(self) -> &'static str {
        match self {
            EdgeColor::Cyan => "cyan",
            EdgeColor::Green => "green",
            EdgeColor::Blue => "blue",
            EdgeColor::Red => "red",
            EdgeColor::Black => "black",
        }
    }
}

fn node_label(inst: Option<InstId>) -> String {
    match inst {
        None => "start".to_string(),
        Some(id) => format!("i{}", id.index()),
    }
}

/// Writes one `.dot` document to `out`, named `<dag_id>@<stage>.dot` by the
/// caller (the engine names the file; this function only writes the body).
pub fn write_pheromone_graph(
    out: &mut String,
    pheromone: &PheromoneMatrix,
    n: u32,
    iter_best: Option<&Schedule>,
    global_best: Option<&Schedule>,
    any_ant_walked: &[(Option<InstId>, InstId)],
) -> std::fmt::Result {
    writeln!(out, "digraph pheromone {{")?;

    let iter_edges: Vec<_> = iter_best.map(schedule_edges).unwrap_or_default();
    let best_edges: Vec<_> = global_best.map(schedule_edges).unwrap_or_default();

    for row in 0..=n {
        let last = if row == 0 {
            None
        } else {
            Some(InstId::from_u32(row - 1))
        };
        for col in 0..n {
            let next = InstId::from_u32(col);
            let p = pheromone.get(last, next);

            let in_iter = iter_edges.contains(&(last, next));
            let in_best = best_edges.contains(&(last, next));
            let in_any = any_ant_walked.contains(&(last, next));

            let color = match (in_best, in_iter, in_any) {
                (true, true, _) => EdgeColor::Cyan,
                (false, true, _) => EdgeColor::Green,
                (true, false, _) => EdgeColor::Blue,
                (false, false, true) => EdgeColor::Red,
                (false, false, false) => EdgeColor::Black,
            };

            writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{:.3}\", color={}];",
                node_label(last),
                node_label(next),
                p,
                color.as_str()
            )?;
        }
    }

    writeln!(out, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_well_formed_dot_document() {
        let mut m = PheromoneMatrix::new(2, 1.0, 8.0);
        m.seed(2.0);
        let mut out = String::new();
        write_pheromone_graph(&mut out, &m, 2, None, None, &[]).unwrap();
        assert!(out.starts_with("digraph pheromone {"));
        assert!(out.trim_end().ends_with('}'));
        assert!(out.contains("\"start\""));
    }
}
