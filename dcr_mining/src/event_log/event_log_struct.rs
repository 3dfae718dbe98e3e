use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Activity label in an event log.
///
/// Labels are compared by exact, case-sensitive string identity.
pub type Activity = String;

/// A trace: one ordered sequence of activity occurrences representing a single case's history.
pub type Trace = Vec<Activity>;

/// An event log: an ordered sequence of [`Trace`]s.
///
/// The order of events inside a trace defines "happened-before" within that case; traces are
/// otherwise independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// Traces of the event log
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Create a new, empty [`EventLog`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of traces in the log.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the log contains no traces.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Append a trace to the log.
    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// The activity alphabet: the set of distinct activity labels appearing anywhere in the log.
    pub fn activities(&self) -> HashSet<&Activity> {
        self.traces.iter().flatten().collect()
    }

    /// The activity alphabet as a lexicographically sorted list of owned labels.
    ///
    /// Useful wherever iteration order must be reproducible (e.g., candidate pair enumeration).
    pub fn sorted_activities(&self) -> Vec<Activity> {
        let mut acts: Vec<Activity> = self.activities().into_iter().cloned().collect();
        acts.sort();
        acts
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

impl From<Vec<Trace>> for EventLog {
    fn from(traces: Vec<Trace>) -> Self {
        Self { traces }
    }
}

impl FromIterator<Trace> for EventLog {
    fn from_iter<T: IntoIterator<Item = Trace>>(iter: T) -> Self {
        Self {
            traces: iter.into_iter().collect(),
        }
    }
}
