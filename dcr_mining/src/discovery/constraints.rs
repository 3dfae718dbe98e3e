//! The individual relation-discovery algorithms.
//!
//! Each algorithm is a pure function of an [`EventLog`] (and, for the fraction-based family, a
//! threshold) to a set of directed activity pairs. The threshold is the minimum fraction of
//! traces in which the candidate relation must hold to be discovered; the default
//! [`DEFAULT_THRESHOLD`] of `1.0` requires the relation to hold in every trace. Thresholds are
//! used as given (no clamping), so a threshold above `1.0` discovers nothing.
//!
//! All algorithms return an empty set for the empty log.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::dcr::dcr_graph_struct::Relation;
use crate::event_log::event_log_struct::{Activity, EventLog, Trace};

/// Default threshold for the fraction-based discovery algorithms: the candidate relation must
/// hold in every trace of the log.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Fraction of traces satisfying `predicate` (0 for the empty log).
fn fraction_of_traces<P>(log: &EventLog, predicate: P) -> f64
where
    P: Fn(&Trace) -> bool,
{
    if log.traces.is_empty() {
        return 0.0;
    }
    let mut satisfying = 0usize;
    for trace in &log.traces {
        if predicate(trace) {
            satisfying += 1;
        }
    }
    satisfying as f64 / log.traces.len() as f64
}

/// Evaluates `predicate` for every ordered candidate pair `(a, b)` with `a != b` in parallel and
/// keeps the pairs whose per-trace predicate holds in at least `threshold` of all traces.
fn thresholded_pairs<P>(log: &EventLog, threshold: f64, predicate: P) -> HashSet<Relation>
where
    P: Fn(&Trace, &Activity, &Activity) -> bool + Sync,
{
    let acts = log.sorted_activities();
    acts.par_iter()
        .flat_map_iter(|a| acts.iter().filter(move |b| *b != a).map(move |b| (a, b)))
        .filter(|&(a, b)| fraction_of_traces(log, |trace| predicate(trace, a, b)) >= threshold)
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect()
}

/// Discovers `AtMostOne` constraints from the given log.
///
/// An activity `a` satisfies the per-trace predicate if it occurs at most once in that trace;
/// the discovered pairs are self-pairs `(a, a)`, encoding "a occurs at most once" as a
/// self-exclusion.
pub fn at_most_one(log: &EventLog, threshold: f64) -> HashSet<Relation> {
    log.sorted_activities()
        .into_iter()
        .filter(|a| {
            fraction_of_traces(log, |trace| trace.iter().filter(|e| *e == a).count() <= 1)
                >= threshold
        })
        .map(|a| (a.clone(), a))
        .collect()
}

/// Discovers `Precedence` constraints from the given log.
///
/// `(a, b)` holds in a trace if every occurrence of `b` has some occurrence of `a` earlier in
/// the same trace (vacuously true if `b` is absent).
pub fn precedence(log: &EventLog, threshold: f64) -> HashSet<Relation> {
    thresholded_pairs(log, threshold, |trace, a, b| {
        match trace.iter().position(|e| e == b) {
            Some(first_b) => trace[..first_b].iter().any(|e| e == a),
            None => true,
        }
    })
}

/// Discovers `InferredConditions` constraints from the given log.
///
/// The predicate is identical to [`precedence`]; this delegating alias is kept for parity with
/// the original API surface.
pub fn inferred_conditions(log: &EventLog, threshold: f64) -> HashSet<Relation> {
    precedence(log, threshold)
}

/// Discovers `Response` constraints from the given log.
///
/// `(a, b)` holds in a trace if every occurrence of `a` has some occurrence of `b` later in the
/// same trace (vacuously true if `a` is absent).
pub fn response(log: &EventLog, threshold: f64) -> HashSet<Relation> {
    thresholded_pairs(log, threshold, |trace, a, b| {
        match trace.iter().rposition(|e| e == a) {
            Some(last_a) => trace[last_a + 1..].iter().any(|e| e == b),
            None => true,
        }
    })
}

/// Discovers `ChainPrecedence` constraints from the given log (exact, no threshold).
///
/// For each activity `b`, the activities immediately preceding each occurrence of `b` are
/// collected across all traces; an occurrence of `b` as the first event of a trace disqualifies
/// `b`. If exactly one distinct predecessor `a` remains over the whole log, `(a, b)` is
/// discovered.
pub fn chain_precedence(log: &EventLog) -> HashSet<Relation> {
    let mut result = HashSet::new();

    for b in log.sorted_activities() {
        let mut required_predecessor: Option<&Activity> = None;
        let mut valid = true;

        for trace in &log.traces {
            for i in 1..trace.len() {
                if trace[i] == b {
                    let a = &trace[i - 1];
                    match required_predecessor {
                        None => required_predecessor = Some(a),
                        Some(required) if required != a => {
                            valid = false;
                            break;
                        }
                        Some(_) => {}
                    }
                }
            }
            if !valid {
                break;
            }

            if trace.first() == Some(&b) {
                valid = false;
                break;
            }
        }

        if valid {
            if let Some(a) = required_predecessor {
                result.insert((a.clone(), b.clone()));
            }
        }
    }

    result
}

/// Discovers `MutuallyExclusive` constraints from the given log.
///
/// `(a, b)` with `a != b` is discovered if no trace contains both `a` and `b`; the result is
/// symmetric, containing both orientations of each such pair.
pub fn mutually_exclusive(log: &EventLog) -> HashSet<Relation> {
    let acts = log.sorted_activities();
    let mut result = HashSet::new();

    for a in &acts {
        for b in &acts {
            if a != b && !are_co_occurring(log, a, b) {
                result.insert((a.clone(), b.clone()));
            }
        }
    }

    result
}

/// Discovers `NotChainSuccession` constraints from the given log.
///
/// `(a, b)` with `a != b` is discovered if no trace contains `a` immediately followed by `b`.
pub fn not_chain_succession(log: &EventLog) -> HashSet<Relation> {
    let mut directly_follows: HashSet<(&Activity, &Activity)> = HashSet::new();
    for trace in &log.traces {
        for pair in trace.windows(2) {
            directly_follows.insert((&pair[0], &pair[1]));
        }
    }

    let acts = log.sorted_activities();
    let mut result = HashSet::new();
    for a in &acts {
        for b in &acts {
            if a != b && !directly_follows.contains(&(a, b)) {
                result.insert((a.clone(), b.clone()));
            }
        }
    }

    result
}

/// Discovers `AlternatePrecedence` constraints from the given log.
///
/// `(a, b)` holds in a trace if every occurrence of `b` is immediately preceded by `a`
/// (an occurrence of `b` as the first event fails the predicate; a trace without `b` satisfies
/// it vacuously).
pub fn alternate_precedence(log: &EventLog, threshold: f64) -> HashSet<Relation> {
    thresholded_pairs(log, threshold, |trace, a, b| {
        trace
            .iter()
            .enumerate()
            .all(|(i, e)| e != b || (i > 0 && &trace[i - 1] == a))
    })
}

/// Computes the predecessor/successor index of the given log.
///
/// For each activity `x`, `predecessors[x]` contains all activities occurring anywhere before
/// any occurrence of `x` in any trace, and `successors[x]` all activities occurring anywhere
/// after. Every activity of the log has an entry (possibly empty) in both maps.
#[allow(clippy::type_complexity)]
pub fn determine_predecessor_successor(
    log: &EventLog,
) -> (
    HashMap<Activity, HashSet<Activity>>,
    HashMap<Activity, HashSet<Activity>>,
) {
    let mut predecessors: HashMap<Activity, HashSet<Activity>> = HashMap::new();
    let mut successors: HashMap<Activity, HashSet<Activity>> = HashMap::new();

    for activity in log.activities() {
        predecessors.entry(activity.clone()).or_default();
        successors.entry(activity.clone()).or_default();
    }

    for trace in &log.traces {
        let mut seen_before: HashSet<&Activity> = HashSet::new();
        for event in trace {
            if let Some(preds) = predecessors.get_mut(event) {
                preds.extend(seen_before.iter().map(|s| (*s).clone()));
            }
            seen_before.insert(event);
        }

        let mut seen_after: HashSet<&Activity> = HashSet::new();
        for event in trace.iter().rev() {
            if let Some(succs) = successors.get_mut(event) {
                succs.extend(seen_after.iter().map(|s| (*s).clone()));
            }
            seen_after.insert(event);
        }
    }

    (predecessors, successors)
}

/// Whether some trace of the log contains both `a` and `b`, regardless of order or count.
pub fn are_co_occurring(log: &EventLog, a: &str, b: &str) -> bool {
    log.traces
        .iter()
        .any(|trace| trace.iter().any(|e| e == a) && trace.iter().any(|e| e == b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::event_log_from;

    fn pair(a: &str, b: &str) -> Relation {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn at_most_one_single_trace_without_repeats() {
        let log = event_log_from(&[&["A", "B", "C"]]);
        let result = at_most_one(&log, DEFAULT_THRESHOLD);
        let expected: HashSet<Relation> =
            [pair("A", "A"), pair("B", "B"), pair("C", "C")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_skips_repeated_activities() {
        let log = event_log_from(&[&["A", "A", "B", "C", "C", "C"]]);
        let result = at_most_one(&log, DEFAULT_THRESHOLD);
        let expected: HashSet<Relation> = [pair("B", "B")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_requires_all_traces_at_full_threshold() {
        let log = event_log_from(&[&["A", "B"], &["A", "A", "B"]]);
        let result = at_most_one(&log, 1.0);
        let expected: HashSet<Relation> = [pair("B", "B")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_admits_partial_violations_below_threshold() {
        let log = event_log_from(&[&["A", "B"], &["A", "A", "B"]]);
        let result = at_most_one(&log, 0.5);
        let expected: HashSet<Relation> =
            [pair("A", "A"), pair("B", "B")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_zero_threshold_admits_everything() {
        let log = event_log_from(&[&["A", "A", "B"]]);
        let result = at_most_one(&log, 0.0);
        let expected: HashSet<Relation> =
            [pair("A", "A"), pair("B", "B")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_fractional_threshold() {
        let log = event_log_from(&[&["A"], &["A", "A"], &[]]);
        let result = at_most_one(&log, 2.0 / 3.0);
        let expected: HashSet<Relation> = [pair("A", "A")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn at_most_one_empty_log() {
        assert!(at_most_one(&EventLog::new(), DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn at_most_one_empty_traces() {
        let log = event_log_from(&[&[], &[]]);
        assert!(at_most_one(&log, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn precedence_is_directed() {
        let log = event_log_from(&[&["A", "B"]]);
        let result = precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("B", "A")));
    }

    #[test]
    fn precedence_holds_with_gaps() {
        let log = event_log_from(&[
            &["A", "G", "B"],
            &["A", "B"],
            &["A", "H", "I", "B"],
        ]);
        let result = precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn precedence_vacuous_when_target_absent() {
        let log = event_log_from(&[&["A", "G", "B"], &["A", "H", "I"]]);
        let result = precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn precedence_full_threshold_rejects_partial() {
        let log = event_log_from(&[&["A", "B"], &["B", "A"]]);
        let result = precedence(&log, 1.0);
        assert!(!result.contains(&pair("A", "B")));
    }

    #[test]
    fn precedence_half_threshold_admits_partial() {
        let log = event_log_from(&[&["A", "B"], &["B", "A"]]);
        let result = precedence(&log, 0.5);
        assert!(result.contains(&pair("A", "B")));
        assert!(result.contains(&pair("B", "A")));
    }

    #[test]
    fn precedence_is_transitive_over_a_linear_trace() {
        let log = event_log_from(&[&["A", "B", "C"]]);
        let result = precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
        assert!(result.contains(&pair("A", "C")));
        assert!(result.contains(&pair("B", "C")));
        assert!(!result.contains(&pair("C", "A")));
    }

    #[test]
    fn precedence_threshold_above_one_discovers_nothing() {
        let log = event_log_from(&[&["A", "B"]]);
        assert!(precedence(&log, 1.5).is_empty());
    }

    #[test]
    fn inferred_conditions_matches_precedence() {
        let log = event_log_from(&[&["A", "B", "C"], &["B", "A", "C"]]);
        assert_eq!(
            inferred_conditions(&log, 0.5),
            precedence(&log, 0.5)
        );
    }

    #[test]
    fn response_simple() {
        let log = event_log_from(&[&["A", "B"]]);
        let result = response(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("B", "A")));
    }

    #[test]
    fn response_every_occurrence_needs_a_later_target() {
        let log = event_log_from(&[&["B", "A", "G", "B"]]);
        let result = response(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn response_repeated_source_satisfied_by_final_target() {
        let log = event_log_from(&[&["A", "G", "A", "H", "B"]]);
        let result = response(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn response_rejected_when_last_source_unanswered() {
        let log = event_log_from(&[&["A", "B", "A", "G"]]);
        let result = response(&log, DEFAULT_THRESHOLD);
        assert!(!result.contains(&pair("A", "B")));
    }

    #[test]
    fn response_threshold_three_quarters_rejects_half() {
        let log = event_log_from(&[&["A", "B"], &["A", "G"]]);
        let result = response(&log, 0.75);
        assert!(!result.contains(&pair("A", "B")));
    }

    #[test]
    fn response_threshold_two_fifths_admits_half() {
        let log = event_log_from(&[&["A", "B"], &["A", "G"]]);
        let result = response(&log, 0.4);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn chain_precedence_unique_predecessor() {
        let log = event_log_from(&[&["A", "B"], &["C", "A", "B"]]);
        let result = chain_precedence(&log);
        assert!(result.contains(&pair("A", "B")));
    }

    #[test]
    fn chain_precedence_conflicting_predecessors() {
        let log = event_log_from(&[&["A", "B"], &["G", "B"]]);
        let result = chain_precedence(&log);
        assert!(!result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("G", "B")));
    }

    #[test]
    fn chain_precedence_first_event_disqualifies() {
        let log = event_log_from(&[&["B", "A"], &["A", "B"]]);
        assert!(chain_precedence(&log).is_empty());
    }

    #[test]
    fn chain_precedence_never_targets_trace_initial_activity() {
        let log = event_log_from(&[&["B", "A"], &["B", "C"]]);
        let result = chain_precedence(&log);
        assert!(!result.iter().any(|(_, b)| b == "B"));
        assert!(result.contains(&pair("B", "A")));
        assert!(result.contains(&pair("B", "C")));
    }

    #[test]
    fn chain_precedence_empty_log() {
        assert!(chain_precedence(&EventLog::new()).is_empty());
    }

    #[test]
    fn mutually_exclusive_is_symmetric() {
        let log = event_log_from(&[&["A"], &["B"]]);
        let result = mutually_exclusive(&log);
        assert!(result.contains(&pair("A", "B")));
        assert!(result.contains(&pair("B", "A")));
    }

    #[test]
    fn mutually_exclusive_rejects_co_occurrence() {
        let log = event_log_from(&[&["A", "B"], &["C"]]);
        let result = mutually_exclusive(&log);
        assert!(!result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("B", "A")));
        assert!(result.contains(&pair("A", "C")));
        assert!(result.contains(&pair("B", "C")));
    }

    #[test]
    fn not_chain_succession_rejects_adjacency() {
        let log = event_log_from(&[&["A", "B", "C"]]);
        let result = not_chain_succession(&log);
        assert!(!result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("B", "C")));
        assert!(result.contains(&pair("A", "C")));
        assert!(result.contains(&pair("B", "A")));
    }

    #[test]
    fn not_chain_succession_considers_all_traces() {
        let log = event_log_from(&[&["A", "C"], &["A", "B"]]);
        let result = not_chain_succession(&log);
        assert!(!result.contains(&pair("A", "B")));
        assert!(!result.contains(&pair("A", "C")));
        assert!(result.contains(&pair("B", "C")));
    }

    #[test]
    fn alternate_precedence_adjacent_pairs() {
        let log = event_log_from(&[&["A", "B", "C"]]);
        let result = alternate_precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("A", "B")));
        assert!(result.contains(&pair("B", "C")));
        assert!(!result.contains(&pair("A", "C")));
    }

    #[test]
    fn alternate_precedence_deduplicates_across_traces() {
        let log = event_log_from(&[&["A", "B"], &["A", "B"]]);
        let result = alternate_precedence(&log, DEFAULT_THRESHOLD);
        let expected: HashSet<Relation> = [pair("A", "B")].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn alternate_precedence_requires_every_occurrence_adjacent() {
        let log = event_log_from(&[&["G", "H", "I"], &["G", "J", "I"]]);
        let result = alternate_precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("G", "H")));
        assert!(result.contains(&pair("G", "J")));
        assert!(!result.contains(&pair("H", "I")));
        assert!(!result.contains(&pair("J", "I")));
    }

    #[test]
    fn alternate_precedence_holds_in_both_traces() {
        let log = event_log_from(&[&["A", "B", "C"], &["B", "C", "D"]]);
        let result = alternate_precedence(&log, DEFAULT_THRESHOLD);
        assert!(result.contains(&pair("B", "C")));
    }

    #[test]
    fn alternate_precedence_single_activity_traces() {
        let log = event_log_from(&[&["A"], &["B"]]);
        assert!(alternate_precedence(&log, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn alternate_precedence_empty_log() {
        assert!(alternate_precedence(&EventLog::new(), DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn predecessor_successor_linear_trace() {
        let log = event_log_from(&[&["A", "B", "C"]]);
        let (pred, succ) = determine_predecessor_successor(&log);

        assert!(pred["A"].is_empty());
        assert_eq!(pred["B"], ["A".to_string()].into_iter().collect());
        assert_eq!(
            pred["C"],
            ["A".to_string(), "B".to_string()].into_iter().collect()
        );

        assert_eq!(
            succ["A"],
            ["B".to_string(), "C".to_string()].into_iter().collect()
        );
        assert_eq!(succ["B"], ["C".to_string()].into_iter().collect());
        assert!(succ["C"].is_empty());
    }

    #[test]
    fn predecessor_successor_across_traces() {
        let log = event_log_from(&[&["A", "B", "C"], &["B", "D"]]);
        let (pred, succ) = determine_predecessor_successor(&log);

        assert!(pred["A"].is_empty());
        assert_eq!(pred["B"], ["A".to_string()].into_iter().collect());
        assert_eq!(pred["D"], ["B".to_string()].into_iter().collect());
        assert_eq!(
            succ["B"],
            ["C".to_string(), "D".to_string()].into_iter().collect()
        );
        assert!(succ["D"].is_empty());
    }

    #[test]
    fn predecessor_successor_with_repeats() {
        let log = event_log_from(&[&["A", "B", "A", "C"]]);
        let (pred, succ) = determine_predecessor_successor(&log);

        assert_eq!(
            pred["A"],
            ["A".to_string(), "B".to_string()].into_iter().collect()
        );
        assert_eq!(pred["B"], ["A".to_string()].into_iter().collect());
        assert_eq!(
            succ["A"],
            ["A".to_string(), "B".to_string(), "C".to_string()]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn co_occurrence_ignores_order() {
        let log = event_log_from(&[&["B", "A"], &["C"]]);
        assert!(are_co_occurring(&log, "A", "B"));
        assert!(are_co_occurring(&log, "B", "A"));
        assert!(!are_co_occurring(&log, "A", "C"));
    }
}
