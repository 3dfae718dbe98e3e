//! Redundancy removal on discovered relation sets.
//!
//! Conditions and responses undergo a reachability-based transitive reduction; excludes undergo
//! an alternate-precedence-aware redundancy removal. On cyclic relations the reduction is
//! reachability-based rather than a canonical minimum-edge reduction, so its result depends on
//! the edge-processing order; edges are therefore always processed in lexicographic order,
//! which makes the outcome reproducible (and the reduction idempotent).

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::dcr::dcr_graph_struct::{DcrGraph, Relation};

/// Removes condition edges that are implied by a path of other condition edges.
pub fn remove_transitive_conditions(graph: &mut DcrGraph) {
    transitive_reduction(&mut graph.conditions);
}

/// Removes response edges that are implied by a path of other response edges.
pub fn remove_transitive_responses(graph: &mut DcrGraph) {
    transitive_reduction(&mut graph.responses);
}

/// Removes exclude edges that provide no new information given the alternate-precedence
/// relation: `Exclude(a, b)` is dropped if some other `Exclude(x, b)` with `x != a` exists such
/// that `x` alternate-precedes `a`; in that case `x`'s exclusion of `b` already covers `a`'s.
///
/// This is a domain-specific heuristic, not generic transitivity.
pub fn remove_redundant_excludes(graph: &mut DcrGraph, alternate_precedence: &HashSet<Relation>) {
    let mut to_remove: HashSet<Relation> = HashSet::new();

    for (a, b) in &graph.excludes {
        for (x, y) in &graph.excludes {
            if y != b || a == x {
                continue;
            }
            if alternate_precedence.contains(&(x.clone(), a.clone())) {
                to_remove.insert((a.clone(), b.clone()));
                break;
            }
        }
    }

    for relation in to_remove {
        graph.excludes.remove(&relation);
    }
}

/// Probe each edge in lexicographic order: remove it, and restore it only if its target is no
/// longer reachable from its source through the remaining edges.
fn transitive_reduction(edges: &mut HashSet<Relation>) {
    let snapshot: Vec<Relation> = edges.iter().cloned().sorted().collect();

    for edge in snapshot {
        if !edges.contains(&edge) {
            continue;
        }

        edges.remove(&edge);

        if !has_path(edges, &edge.0, &edge.1) {
            edges.insert(edge);
        }
    }
}

/// Directed reachability of `target` from `start` over the given edges (DFS).
fn has_path(edges: &HashSet<Relation>, start: &str, target: &str) -> bool {
    if start == target {
        return true;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (a, b) in edges {
        adjacency.entry(a).or_default().push(b);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(current) = stack.pop() {
        if let Some(successors) = adjacency.get(current) {
            for &successor in successors {
                if successor == target {
                    return true;
                }
                if visited.insert(successor) {
                    stack.push(successor);
                }
            }
        }
    }

    false
}
