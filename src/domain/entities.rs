//! Domain entities: core data structures

use std::collections::HashMap;
use std::fmt;

/// A part from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Part {
    pub category: String,
    pub name: String,
    /// Name of the tech node that unlocks this part (trimmed, never empty)
    pub tech_node: Option<String>,
    /// Free-form size class, may be empty
    pub size: String,
}

impl Part {
    /// Size for display, or `None` when it is empty or whitespace.
    pub fn display_size(&self) -> Option<&str> {
        let size = self.size.trim();
        (!size.is_empty()).then_some(size)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_size() {
            Some(size) => write!(f, "{} ({})", self.name, size),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A node in the technology tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechNode {
    pub name: String,
    pub tier: i64,
    pub description: String,
    /// Prerequisite node names as written, in order (may name missing nodes)
    pub prerequisites: Vec<String>,
    /// Parts unlocked by this node, in catalog order
    pub parts: Vec<Part>,
}

/// Ordered mapping of node name to [`TechNode`].
///
/// Iteration follows insertion order (the row order of the source table).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechTree {
    nodes: Vec<TechNode>,
    index: HashMap<String, usize>,
}

impl TechTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns the node back if the name is already taken.
    pub fn insert(&mut self, node: TechNode) -> Result<(), TechNode> {
        if self.index.contains_key(&node.name) {
            return Err(node);
        }
        self.index.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TechNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TechNode> {
        match self.index.get(name) {
            Some(&i) => self.nodes.get_mut(i),
            None => None,
        }
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TechNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of parts assigned across all nodes.
    pub fn assigned_part_count(&self) -> usize {
        self.nodes.iter().map(|n| n.parts.len()).sum()
    }

    /// Prerequisite references that name no node, as `(node, missing)` pairs.
    pub fn dangling_prerequisites(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|n| {
                n.prerequisites
                    .iter()
                    .filter(|p| !self.contains(p))
                    .map(move |p| (n.name.as_str(), p.as_str()))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a TechTree {
    type Item = &'a TechNode;
    type IntoIter = std::slice::Iter<'a, TechNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Result of joining the parts catalog onto the tech tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Tech tree with part lists populated
    pub tree: TechTree,
    /// Parts with no (valid) tech node, in catalog order
    pub unassigned: Vec<Part>,
    /// Number of parts read from the catalog
    pub part_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, prerequisites: &[&str]) -> TechNode {
        TechNode {
            name: name.to_string(),
            tier: 0,
            description: String::new(),
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
            parts: Vec::new(),
        }
    }

    #[test]
    fn given_nodes_when_iterating_then_keeps_insertion_order() {
        let mut tree = TechTree::new();
        for name in ["zeta", "alpha", "mid"] {
            tree.insert(node(name, &[])).unwrap();
        }

        let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn given_existing_name_when_inserting_then_rejects_node() {
        let mut tree = TechTree::new();
        tree.insert(node("A", &[])).unwrap();

        let rejected = tree.insert(node("A", &["X"])).unwrap_err();
        assert_eq!(rejected.prerequisites, vec!["X".to_string()]);
        assert_eq!(tree.len(), 1);
        assert!(tree.get("A").unwrap().prerequisites.is_empty());
    }

    #[test]
    fn given_missing_prerequisites_when_listing_dangling_then_reports_pairs() {
        let mut tree = TechTree::new();
        tree.insert(node("A", &[])).unwrap();
        tree.insert(node("B", &["A", "Z"])).unwrap();

        assert_eq!(tree.dangling_prerequisites(), vec![("B", "Z")]);
    }

    #[test]
    fn given_blank_size_when_displaying_then_returns_none() {
        let part = Part {
            category: "Fuel".into(),
            name: "F1".into(),
            tech_node: None,
            size: "  ".into(),
        };
        assert_eq!(part.display_size(), None);
    }
}
