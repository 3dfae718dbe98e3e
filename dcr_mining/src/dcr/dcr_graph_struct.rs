use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::event_log::event_log_struct::{Activity, EventLog};

/// A directed relation pair `(source, target)` between two activity labels.
pub type Relation = (Activity, Activity);

/// The four DCR relation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    /// Condition relations: the target may not execute unless the source has executed before.
    Conditions,
    /// Response relations: executing the source obliges the target to execute later.
    Responses,
    /// Exclude relations: executing the source removes the target from the included activities.
    Excludes,
    /// Include relations: executing the source (re-)admits the target into the included activities.
    Includes,
}

/// A DCR (Dynamic Condition Response) graph.
///
/// Activities plus four directed relation sets. The relation containers are true sets: no
/// duplicates, no meaningful order, and no implicit symmetry. `events` and `labeling` map one
/// unique identifier per activity occurrence across the originating log (assigned `1..` in
/// log-iteration order) to the activity label it represents.
///
/// After construction every activity referenced by a relation pair is a member of `activities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcrGraph {
    /// Per-occurrence event identifiers
    pub events: HashSet<usize>,
    /// Activity labels
    pub activities: HashSet<Activity>,
    /// Mapping from event identifier to the activity it represents
    pub labeling: HashMap<usize, Activity>,
    /// Condition relations
    pub conditions: HashSet<Relation>,
    /// Response relations
    pub responses: HashSet<Relation>,
    /// Exclude relations (self-pairs encode "occurs at most once")
    pub excludes: HashSet<Relation>,
    /// Include relations
    pub includes: HashSet<Relation>,
}

impl DcrGraph {
    /// Create a new, empty [`DcrGraph`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize a graph with the activities and per-occurrence event labeling of the given
    /// log, and no relations.
    pub fn from_log(log: &EventLog) -> Self {
        let mut graph = Self::new();
        let mut id = 1usize;
        for trace in &log.traces {
            for activity in trace {
                graph.activities.insert(activity.clone());
                graph.labeling.insert(id, activity.clone());
                graph.events.insert(id);
                id += 1;
            }
        }
        graph
    }

    /// Checks if an activity is part of the graph.
    pub fn contains_activity<S: AsRef<str>>(&self, activity: S) -> bool {
        self.activities.contains(activity.as_ref())
    }

    /// Total number of relations across all four categories.
    pub fn total_relations(&self) -> usize {
        self.conditions.len() + self.responses.len() + self.excludes.len() + self.includes.len()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
