//! Marking-based DCR trace replay.
//!
//! A trace is replayed against a read-only [`DcrGraph`] using a marking of three activity-label
//! sets (included, executed, pending). Rule violations are not errors in the Rust sense but
//! structured diagnostics: every violation becomes one entry in the result's ordered error
//! list, and replay never aborts early, so the fitness metric observes all violations.

use std::collections::HashSet;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dcr::dcr_graph_struct::DcrGraph;
use crate::event_log::event_log_struct::{Activity, EventLog, Trace};

/// Outcome of replaying a single trace against a DCR graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformanceResult {
    /// The trace that was checked
    pub trace: Trace,
    /// Whether the trace violated no rule
    pub is_conformant: bool,
    /// One entry per rule violation, in the order the violations were observed
    pub errors: Vec<String>,
    /// Fraction of the graph's relations not violated during the replay, in `[0, 1]`
    pub fitness: f64,
}

/// Replay one trace against the graph from the canonical initial marking (all activities
/// included, none executed, none pending).
///
/// Events whose label is not an activity of the graph are ignored (noise tolerance). An event
/// executed while excluded is reported but still processed in full, so all further violations
/// of the same trace are observed.
pub fn check_trace(graph: &DcrGraph, trace: &[Activity]) -> ConformanceResult {
    let mut executed: HashSet<&str> = HashSet::new();
    let mut pending: HashSet<&str> = HashSet::new();
    let mut included: HashSet<&str> = graph.activities.iter().map(String::as_str).collect();
    let mut errors: Vec<String> = Vec::new();

    for activity in trace {
        if !graph.contains_activity(activity) {
            continue;
        }

        if !included.contains(activity.as_str()) {
            errors.push(format!("Activity '{activity}' was executed while excluded."));
        }

        for (a, b) in graph.conditions.iter().sorted() {
            if b == activity && !executed.contains(a.as_str()) {
                errors.push(format!("Condition failed: '{a}' must precede '{b}'."));
            }
        }

        executed.insert(activity);
        pending.remove(activity.as_str());

        for (a, b) in &graph.responses {
            if a == activity {
                pending.insert(b);
            }
        }

        // Excludes before includes: an activity excluded and re-included by the same event
        // stays executable.
        for (a, b) in &graph.excludes {
            if a == activity {
                included.remove(b.as_str());
            }
        }

        for (a, b) in &graph.includes {
            if a == activity {
                included.insert(b);
            }
        }
    }

    for unanswered in pending.iter().sorted() {
        errors.push(format!("Pending response '{unanswered}' was not executed."));
    }

    let fitness = compute_fitness(errors.len(), graph);

    ConformanceResult {
        trace: trace.to_vec(),
        is_conformant: errors.is_empty(),
        errors,
        fitness,
    }
}

/// Replay every trace of the log independently from the canonical initial marking.
///
/// Returns the per-trace results sorted ascending by fitness (worst first) together with the
/// conformance rate: the percentage of conformant traces, defined as `0` for the empty log.
pub fn check_log(graph: &DcrGraph, log: &EventLog) -> (Vec<ConformanceResult>, f64) {
    let mut results: Vec<ConformanceResult> = log
        .traces
        .par_iter()
        .map(|trace| check_trace(graph, trace))
        .collect();

    let conformant = results.iter().filter(|r| r.is_conformant).count();
    let conformance_rate = if log.traces.is_empty() {
        0.0
    } else {
        conformant as f64 / log.traces.len() as f64 * 100.0
    };

    results.sort_by_key(|r| OrderedFloat(r.fitness));

    (results, conformance_rate)
}

/// `1.0` for a graph without relations, otherwise the clamped fraction of relations that were
/// not violated.
fn compute_fitness(error_count: usize, graph: &DcrGraph) -> f64 {
    let total_relations = graph.total_relations();
    if total_relations == 0 {
        return 1.0;
    }
    ((total_relations as f64 - error_count as f64) / total_relations as f64).clamp(0.0, 1.0)
}
