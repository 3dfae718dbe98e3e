use std::{fs::File, io::Write};

use graphviz_rust::{
    cmd::Format,
    dot_generator::{attr, edge, graph, id, node, node_id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};
use itertools::Itertools;
use uuid::Uuid;

use crate::dcr::dcr_graph_struct::{DcrGraph, Relation};

///
/// Export the image of a [`DcrGraph`]
///
/// Also see [`export_dcr_image_svg`] and [`export_dcr_image_png`]
///
pub fn export_dcr_image<P: AsRef<std::path::Path>>(
    dcr: &DcrGraph,
    path: P,
    format: Format,
) -> Result<(), std::io::Error> {
    let g = export_dcr_to_dot_graph(dcr);

    let out = graphviz_rust::exec(g, &mut PrinterContext::default(), vec![format.into()])?;

    let mut f = File::create(path)?;
    f.write_all(&out)?;
    Ok(())
}

///
/// Export a [`DcrGraph`] to a DOT graph (used in Graphviz)
///
/// One ellipse node per activity; one styled edge per relation instance: condition = solid
/// blue, response = dashed green, exclude = dotted red, include = bold black. Nodes and edges
/// are emitted in lexicographic order, so the output is deterministic.
///
/// Also see [`export_dcr_image`], as well as [`export_dcr_image_svg`] and [`export_dcr_image_png`]
///
pub fn export_dcr_to_dot_graph(dcr: &DcrGraph) -> Graph {
    let activity_nodes: Vec<Stmt> = dcr
        .activities
        .iter()
        .sorted()
        .map(|activity| {
            stmt!(node!(esc activity; attr!("label", esc activity), attr!("shape", "ellipse"), attr!("style", "filled"), attr!("fillcolor", "lightgray")))
        })
        .collect();

    let edges: Vec<Stmt> = [
        relation_edges(&dcr.conditions, "condition", "blue", "solid"),
        relation_edges(&dcr.responses, "response", "green", "dashed"),
        relation_edges(&dcr.excludes, "exclude", "red", "dotted"),
        relation_edges(&dcr.includes, "include", "black", "bold"),
    ]
    .concat();

    graph!(
        di id!(esc Uuid::new_v4()),
        vec![activity_nodes, edges].into_iter().flatten().collect()
    )
}

fn relation_edges(
    relations: &std::collections::HashSet<Relation>,
    label: &str,
    color: &str,
    style: &str,
) -> Vec<Stmt> {
    relations
        .iter()
        .sorted()
        .map(|(a, b)| {
            let attrs = vec![
                attr!("label", label),
                attr!("color", color),
                attr!("style", style),
            ];
            stmt!(edge!(node_id!(esc a) => node_id!(esc b), attrs))
        })
        .collect()
}

///
/// Convert a DOT graph to a String containing the DOT source
///
pub fn graph_to_dot(g: &Graph) -> String {
    g.print(&mut PrinterContext::default())
}

///
/// Write the DOT source of a [`DcrGraph`] to a file
///
/// Unlike the image exports this does not require a local graphviz installation.
///
pub fn export_dcr_dot_file<P: AsRef<std::path::Path>>(
    dcr: &DcrGraph,
    path: P,
) -> Result<(), std::io::Error> {
    let dot = graph_to_dot(&export_dcr_to_dot_graph(dcr));
    let mut f = File::create(path)?;
    f.write_all(dot.as_bytes())?;
    Ok(())
}

///
/// Export the image of a [`DcrGraph`] as a SVG file
///
pub fn export_dcr_image_svg<P: AsRef<std::path::Path>>(
    dcr: &DcrGraph,
    path: P,
) -> Result<(), std::io::Error> {
    export_dcr_image(dcr, path, Format::Svg)
}

///
/// Export the image of a [`DcrGraph`] as a PNG file
///
pub fn export_dcr_image_png<P: AsRef<std::path::Path>>(
    dcr: &DcrGraph,
    path: P,
) -> Result<(), std::io::Error> {
    export_dcr_image(dcr, path, Format::Png)
}
