//! Orchestration of relation discovery into a [`DcrGraph`].
//!
//! The pipeline is deterministic and order-significant: the structural exclude heuristics
//! (steps on predecessor/successor structure) run before the optimizer, and reordering them
//! changes results. Wherever relation sets are mutated while iterating derived data, activities
//! are visited in lexicographic order so repeated runs produce identical graphs.

use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::dcr::dcr_graph_struct::{DcrGraph, RelationType};
use crate::dcr::optimizer::{
    remove_redundant_excludes, remove_transitive_conditions, remove_transitive_responses,
};
use crate::discovery::constraints::{
    alternate_precedence, at_most_one, chain_precedence, determine_predecessor_successor,
    precedence, response, DEFAULT_THRESHOLD,
};
use crate::event_log::event_log_struct::{Activity, EventLog};

/// Parameters for DCR graph discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcrBuilderConfig {
    /// Minimum fraction of traces in which a fraction-based relation must hold to be
    /// discovered (default `1.0`: it must hold in every trace).
    pub threshold: f64,
    /// If set (and non-empty), keep only these activities and the relations fully contained
    /// within them.
    pub activity_filter: Option<HashSet<Activity>>,
    /// If set (and non-empty), keep only the selected relation categories; the others are
    /// emptied.
    pub relation_filter: Option<HashSet<RelationType>>,
}

impl Default for DcrBuilderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            activity_filter: None,
            relation_filter: None,
        }
    }
}

impl DcrBuilderConfig {
    /// Serialize parameters to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Deserialize parameters from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Discover a [`DcrGraph`] from an event log.
pub fn build_dcr_graph(log: &EventLog, config: &DcrBuilderConfig) -> DcrGraph {
    let mut graph = DcrGraph::from_log(log);

    let at_most_once = at_most_one(log, config.threshold);
    for (a, b) in &at_most_once {
        graph.excludes.insert((a.clone(), b.clone()));
    }

    graph.responses.extend(response(log, config.threshold));

    let at_most_once_activities: HashSet<&Activity> =
        at_most_once.iter().map(|(a, _)| a).collect();
    for (a, b) in chain_precedence(log).iter().sorted() {
        if a == b {
            continue;
        }
        if !at_most_once_activities.contains(b) {
            graph.includes.insert((a.clone(), b.clone()));
        }
        graph.excludes.insert((b.clone(), b.clone()));
    }

    graph.conditions.extend(precedence(log, config.threshold));

    let (predecessors, successors) = determine_predecessor_successor(log);
    let sorted_activities = log.sorted_activities();
    let empty: HashSet<Activity> = HashSet::new();

    // Activities that never share a trace with x exclude each other.
    for activity in &sorted_activities {
        let preds = predecessors.get(activity).unwrap_or(&empty);
        let succs = successors.get(activity).unwrap_or(&empty);
        let coexisting: HashSet<&Activity> = preds.union(succs).collect();

        for other in &sorted_activities {
            if other != activity && !coexisting.contains(other) {
                graph.excludes.insert((activity.clone(), other.clone()));
            }
        }
    }

    // Activities that precede x but never succeed it cannot run again once x has run, unless
    // they are already self-excluded.
    for activity in &sorted_activities {
        let preds = predecessors.get(activity).unwrap_or(&empty);
        let succs = successors.get(activity).unwrap_or(&empty);

        for only_preceding in preds.difference(succs).sorted() {
            if !graph
                .excludes
                .contains(&(only_preceding.clone(), only_preceding.clone()))
            {
                graph
                    .excludes
                    .insert((activity.clone(), only_preceding.clone()));
            }
        }
    }

    // Exclusions already carried by a precedence-predecessor are not repeated on x. The lookup
    // deliberately uses an unthresholded precedence computation even when the graph's own
    // conditions were discovered with a lower threshold.
    let precedence_pairs = precedence(log, DEFAULT_THRESHOLD);
    for activity in &sorted_activities {
        let preceding: Vec<&Activity> = precedence_pairs
            .iter()
            .filter(|(_, b)| b == activity)
            .map(|(a, _)| a)
            .sorted()
            .collect();

        for prec in preceding {
            for other in &sorted_activities {
                if graph.excludes.contains(&(prec.clone(), other.clone())) {
                    graph.excludes.remove(&(activity.clone(), other.clone()));
                }
            }
        }
    }

    let alt_precedence = alternate_precedence(log, DEFAULT_THRESHOLD);
    remove_redundant_excludes(&mut graph, &alt_precedence);
    remove_transitive_conditions(&mut graph);
    remove_transitive_responses(&mut graph);

    if let Some(filter) = &config.activity_filter {
        if !filter.is_empty() {
            graph.activities.retain(|a| filter.contains(a));
            graph
                .conditions
                .retain(|(a, b)| filter.contains(a) && filter.contains(b));
            graph
                .responses
                .retain(|(a, b)| filter.contains(a) && filter.contains(b));
            graph
                .excludes
                .retain(|(a, b)| filter.contains(a) && filter.contains(b));
            graph
                .includes
                .retain(|(a, b)| filter.contains(a) && filter.contains(b));
        }
    }

    if let Some(filter) = &config.relation_filter {
        if !filter.is_empty() {
            if !filter.contains(&RelationType::Conditions) {
                graph.conditions.clear();
            }
            if !filter.contains(&RelationType::Responses) {
                graph.responses.clear();
            }
            if !filter.contains(&RelationType::Excludes) {
                graph.excludes.clear();
            }
            if !filter.contains(&RelationType::Includes) {
                graph.includes.clear();
            }
        }
    }

    graph
}
