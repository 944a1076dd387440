//! DOT source writer
//!
//! Serializes a [`GraphModel`] into Graphviz DOT text. The output depends only
//! on the model, so identical input yields byte-identical source.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::graph::{Attrs, GraphModel, VisualNode};

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

fn plain_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*|-?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?))$")
            .expect("static regex")
    })
}

/// Quote an identifier unless DOT accepts it bare.
pub fn quote_id(id: &str) -> String {
    let is_keyword = KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id));
    if !id.is_empty() && !is_keyword && plain_id().is_match(id) {
        return id.to_string();
    }
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render the model as DOT source.
pub fn to_dot(model: &GraphModel) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_graph(&mut out, model);
    out
}

fn write_graph(out: &mut String, model: &GraphModel) -> std::fmt::Result {
    if !model.comment.is_empty() {
        writeln!(out, "// {}", model.comment)?;
    }
    writeln!(out, "digraph {{")?;
    write_attr_stmt(out, 1, "graph", &model.graph_attrs)?;
    write_attr_stmt(out, 1, "node", &model.node_defaults)?;
    write_attr_stmt(out, 1, "edge", &model.edge_defaults)?;

    for node in &model.nodes {
        write_node(out, 1, node)?;
    }
    for edge in &model.edges {
        writeln!(out, "\t{} -> {}", quote_id(&edge.source), quote_id(&edge.target))?;
    }

    if let Some(cluster) = &model.cluster {
        writeln!(out, "\tsubgraph {} {{", quote_id(&cluster.name))?;
        write_attr_stmt(out, 2, "graph", &cluster.attrs)?;
        for node in &cluster.nodes {
            write_node(out, 2, node)?;
        }
        writeln!(out, "\t}}")?;
    }

    writeln!(out, "}}")
}

fn write_attr_stmt(out: &mut String, depth: usize, kind: &str, attrs: &Attrs) -> std::fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}{} [{}]", indent(depth), kind, attr_list(attrs))
}

fn write_node(out: &mut String, depth: usize, node: &VisualNode) -> std::fmt::Result {
    let mut list = format!("label=<{}>", node.label);
    if !node.attrs.is_empty() {
        list.push(' ');
        list.push_str(&attr_list(&node.attrs));
    }
    writeln!(out, "{}{} [{}]", indent(depth), quote_id(&node.id), list)
}

fn attr_list(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!("{}={}", quote_id(k), quote_id(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}
