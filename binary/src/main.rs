use std::process::ExitCode;

use dcr_mining::{
    build_dcr_graph, check_log,
    event_log::{import_csv_log_file, CsvImportOptions},
    DcrBuilderConfig, DcrGraph, EventLog, Trace,
};

fn demo_log() -> EventLog {
    let traces: Vec<Trace> = vec![
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "UserScan",
            "IgnitionStart",
            "Drive",
            "Parked",
            "Payment",
            "Checkout",
        ],
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "UserScan",
            "IgnitionStart",
            "Drive",
            "Drive",
            "Checkout",
        ],
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "UserScan",
            "IgnitionStart",
            "Drive",
            "Parked",
            "Drive",
            "Checkout",
        ],
    ]
    .into_iter()
    .map(|t| t.into_iter().map(String::from).collect())
    .collect();
    EventLog::from(traces)
}

fn print_relations(dcr: &DcrGraph) {
    let mut activities: Vec<_> = dcr.activities.iter().collect();
    activities.sort();
    println!("Activities:");
    for a in activities {
        println!("{a}");
    }

    let mut sections: Vec<(&str, Vec<_>)> = vec![
        ("Excludes", dcr.excludes.iter().collect()),
        ("Includes", dcr.includes.iter().collect()),
        ("Conditions", dcr.conditions.iter().collect()),
        ("Responses", dcr.responses.iter().collect()),
    ];
    for (name, relations) in &mut sections {
        relations.sort();
        println!("\n{name}:");
        for (a, b) in relations {
            println!("{a} -> {b}");
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // Either discover from a CSV log (<csv> <case column> <activity column> [timestamp column])
    // or fall back to a small built-in car sharing log.
    let log = match args.as_slice() {
        [_, csv_path, case_column, activity_column, rest @ ..] => {
            let mut options = CsvImportOptions::new(case_column, activity_column);
            options.timestamp_column = rest.first().cloned();
            match import_csv_log_file(csv_path, &options) {
                Ok(log) => log,
                Err(e) => {
                    eprintln!("Failed to import {csv_path}: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        [_] => demo_log(),
        _ => {
            eprintln!("Usage: binary [<csv> <case column> <activity column> [timestamp column]]");
            return ExitCode::FAILURE;
        }
    };

    println!("Imported log with {} traces", log.len());

    let dcr = build_dcr_graph(&log, &DcrBuilderConfig::default());
    print_relations(&dcr);

    let check_log_input: EventLog = vec![
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "IgnitionStart",
            "Drive",
            "Drive",
            "Drive",
            "Checkout",
        ],
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "UserScan",
            "IgnitionStart",
            "Drive",
            "Drive",
            "Drive",
            "CheckOut",
        ],
        vec![
            "ReservationCreated",
            "CheckIn",
            "CarOpen",
            "UserScan",
            "IgnitionStart",
            "Drive",
            "Drive",
            "Parked",
            "Payment",
            "Drive",
            "Checkout",
        ],
    ]
    .into_iter()
    .map(|t| t.into_iter().map(String::from).collect())
    .collect();

    let (results, conformance_rate) = check_log(&dcr, &check_log_input);

    for (i, result) in results.iter().enumerate() {
        let status = if result.is_conformant {
            "Conformant"
        } else {
            "Not conformant"
        };
        println!("\nTrace {}: {}", i + 1, result.trace.join(", "));
        println!("Status: {status} (fitness {:.2})", result.fitness);
        if let Some(error) = result.errors.first() {
            println!("{error}");
        }
    }

    println!("\nConformance Rate: {conformance_rate:.2}%");

    #[cfg(feature = "graphviz-export")]
    {
        let dot_path = "dcr_graph.dot";
        match dcr_mining::dcr::image_export::export_dcr_dot_file(&dcr, dot_path) {
            Ok(()) => println!("Wrote DOT graph to {dot_path}"),
            Err(e) => eprintln!("Failed to write {dot_path}: {e}"),
        }
    }

    ExitCode::SUCCESS
}
