#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

///
/// Event logs as plain sequences of activity labels, plus CSV import
///
pub mod event_log {
    ///
    /// Event log struct and types
    ///
    pub mod event_log_struct;
    ///
    /// Import CSV files as event logs
    ///
    pub mod import_csv;
    pub use event_log_struct::{Activity, EventLog, Trace};
    pub use import_csv::{
        import_csv_log, import_csv_log_file, CsvImportOptions, CsvLogImportError,
    };
}

///
/// Discovery of DCR graphs from event logs
///
pub mod discovery {
    ///
    /// Threshold-based constraint discovery over event logs
    ///
    pub mod constraints;
    ///
    /// Assemble a full [`DcrGraph`](crate::dcr::DcrGraph) from discovered constraints
    ///
    pub mod graph_builder;
}

///
/// DCR graphs
///
pub mod dcr {
    ///
    /// DCR graph struct and types
    ///
    pub mod dcr_graph_struct;
    #[cfg(feature = "graphviz-export")]
    ///
    /// Graph (image) export of DCR graphs using graphviz (requires `graphviz-export` feature)
    ///
    pub mod image_export;
    ///
    /// Redundancy removal on discovered relation sets
    ///
    pub mod optimizer;
    pub use dcr_graph_struct::DcrGraph;
}

///
/// Conformance checking of event logs against DCR graphs
///
pub mod conformance {
    ///
    /// Rule-based replay of traces on a [`DcrGraph`](crate::dcr::DcrGraph)
    ///
    pub mod dcr_replay;
}


// Re-export main structs and functions

#[doc(inline)]
pub use conformance::dcr_replay::{check_log, check_trace, ConformanceResult};

#[doc(inline)]
pub use dcr::dcr_graph_struct::{DcrGraph, Relation, RelationType};

#[doc(inline)]
pub use discovery::graph_builder::{build_dcr_graph, DcrBuilderConfig};

#[doc(inline)]
pub use event_log::event_log_struct::{Activity, EventLog, Trace};
