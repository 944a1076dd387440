//! Graph model handed to the renderer
//!
//! Turns a joined [`TechTree`] into visual nodes, prerequisite edges and an
//! optional cluster for unassigned parts. Labels are Graphviz HTML-like labels.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Part, TechNode, TechTree};

pub const UNASSIGNED_CLUSTER: &str = "cluster_unassigned";
pub const UNASSIGNED_NODE: &str = "unassigned";
pub const UNASSIGNED_TITLE: &str = "Unassigned Parts";

/// Colours, fonts and spacing of the diagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphStyle {
    /// Layout direction (TB, LR, BT, RL)
    pub rankdir: String,
    pub ranksep: f64,
    pub nodesep: f64,
    pub font: String,
    /// Fill of tech nodes
    pub node_fill: String,
    pub edge_color: String,
    pub arrow_size: f64,
    /// Fill of the unassigned-parts cluster and its node
    pub cluster_fill: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            rankdir: "TB".into(),
            ranksep: 1.0,
            nodesep: 0.5,
            font: "Arial".into(),
            node_fill: "lightblue".into(),
            edge_color: "darkblue".into(),
            arrow_size: 0.8,
            cluster_fill: "lightyellow".into(),
        }
    }
}

/// Attribute list in output order.
pub type Attrs = Vec<(String, String)>;

/// A node as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    pub id: String,
    /// HTML-like label body (without the enclosing `<` `>`)
    pub label: String,
    pub attrs: Attrs,
}

/// Directed edge `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// Sub-graph drawn as a framed cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub attrs: Attrs,
    pub nodes: Vec<VisualNode>,
}

/// Complete description of the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphModel {
    pub comment: String,
    pub graph_attrs: Attrs,
    pub node_defaults: Attrs,
    pub edge_defaults: Attrs,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<Edge>,
    pub cluster: Option<Cluster>,
}

impl GraphModel {
    /// Build the model for a joined tree.
    ///
    /// Edges are only created for prerequisites that exist in the tree;
    /// references to unknown nodes are dropped so draft data still renders.
    pub fn build(tree: &TechTree, unassigned: &[Part], style: &GraphStyle) -> Self {
        let nodes = tree
            .iter()
            .map(|node| VisualNode {
                id: node.name.clone(),
                label: node_label(node),
                attrs: attrs(&[("fillcolor", style.node_fill.as_str())]),
            })
            .collect();

        let edges = tree
            .iter()
            .flat_map(|node| {
                node.prerequisites
                    .iter()
                    .filter(|prereq| tree.contains(prereq))
                    .map(move |prereq| Edge {
                        source: prereq.clone(),
                        target: node.name.clone(),
                    })
            })
            .collect();

        let cluster = (!unassigned.is_empty()).then(|| Cluster {
            name: UNASSIGNED_CLUSTER.to_string(),
            attrs: attrs(&[
                ("fillcolor", style.cluster_fill.as_str()),
                ("label", UNASSIGNED_TITLE),
                ("style", "filled"),
            ]),
            nodes: vec![VisualNode {
                id: UNASSIGNED_NODE.to_string(),
                label: unassigned_label(unassigned),
                attrs: attrs(&[("fillcolor", style.cluster_fill.as_str()), ("shape", "box")]),
            }],
        });

        Self {
            comment: "Tech Tree".to_string(),
            graph_attrs: attrs(&[
                ("nodesep", format_float(style.nodesep).as_str()),
                ("rankdir", style.rankdir.as_str()),
                ("ranksep", format_float(style.ranksep).as_str()),
            ]),
            node_defaults: attrs(&[
                ("fillcolor", style.node_fill.as_str()),
                ("fontname", style.font.as_str()),
                ("shape", "box"),
                ("style", "rounded,filled"),
            ]),
            edge_defaults: attrs(&[
                ("arrowsize", format_float(style.arrow_size).as_str()),
                ("color", style.edge_color.as_str()),
            ]),
            nodes,
            edges,
            cluster,
        }
    }
}

fn attrs(pairs: &[(&str, &str)]) -> Attrs {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Whole numbers keep one decimal place (`1.0`, not `1`).
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// `name (size)`, or just `name` when the size is blank.
pub fn part_entry(part: &Part) -> String {
    let name = escape_html(&part.name);
    match part.display_size() {
        Some(size) => format!("{} ({})", name, escape_html(size)),
        None => name,
    }
}

/// Bold node name, then one bullet per assigned part in a smaller font.
pub fn node_label(node: &TechNode) -> String {
    let mut label = format!("<B>{}</B>", escape_html(&node.name));
    if !node.parts.is_empty() {
        label.push_str("<BR/><FONT POINT-SIZE=\"9\">");
        for part in &node.parts {
            label.push_str("<BR/>  • ");
            label.push_str(&part_entry(part));
        }
        label.push_str("</FONT>");
    }
    label
}

/// Unassigned parts grouped under bold category headings, categories sorted.
pub fn unassigned_label(parts: &[Part]) -> String {
    let mut by_category: BTreeMap<&str, Vec<&Part>> = BTreeMap::new();
    for part in parts {
        by_category.entry(part.category.as_str()).or_default().push(part);
    }

    let mut lines = by_category.into_iter().flat_map(|(category, parts)| {
        std::iter::once(format!("<B>{}:</B>", escape_html(category)))
            .chain(parts.into_iter().map(|p| format!("  • {}", part_entry(p))))
    });

    format!("<FONT POINT-SIZE=\"10\">{}</FONT>", lines.join("<BR/>"))
}

/// Escape text for an HTML-like label.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
