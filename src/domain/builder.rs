//! Builds the tech tree and joins the parts catalog onto it

use tracing::debug;

use crate::domain::entities::{Part, TechNode, TechTree};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::table::Table;

pub const COL_NODE: &str = "Node";
pub const COL_TIER: &str = "Tier";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_PREREQUISITES: &str = "Prerequisites";

pub const COL_CATEGORY: &str = "Category";
pub const COL_NAME: &str = "Name";
pub const COL_TECH_NODE: &str = "Tech Node";
pub const COL_SIZE: &str = "Size";

/// Build the tech tree from the rows of the tech-tree table.
///
/// Every row needs `Node`, `Tier`, `Description` and `Prerequisites`.
/// Prerequisites are comma-separated; pieces are trimmed and empty pieces
/// dropped. They are stored as written and only checked when edges are built.
///
/// # Errors
/// - [`DomainError::MissingColumn`] if a required column is absent
/// - [`DomainError::InvalidTier`] if `Tier` is not an integer
/// - [`DomainError::DuplicateNode`] if a node name repeats
pub fn build_tech_tree(table: &Table) -> DomainResult<TechTree> {
    let mut tree = TechTree::new();

    for record in table.records() {
        let name = record.get(COL_NODE)?.to_string();
        let raw_tier = record.get(COL_TIER)?;
        let tier = raw_tier
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::InvalidTier {
                line: record.line,
                value: raw_tier.to_string(),
            })?;
        let description = record.get(COL_DESCRIPTION)?.to_string();
        let prerequisites = split_prerequisites(record.get(COL_PREREQUISITES)?);

        let node = TechNode {
            name,
            tier,
            description,
            prerequisites,
            parts: Vec::new(),
        };
        tree.insert(node).map_err(|dup| DomainError::DuplicateNode {
            line: record.line,
            name: dup.name,
        })?;
    }

    debug!("build_tech_tree: {} nodes", tree.len());
    Ok(tree)
}

fn split_prerequisites(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the parts catalog.
///
/// `Tech Node` is trimmed and an empty value means the part has no node.
pub fn parse_parts(table: &Table) -> DomainResult<Vec<Part>> {
    table
        .records()
        .iter()
        .map(|record| {
            let tech_node = record.get(COL_TECH_NODE)?.trim();
            Ok(Part {
                category: record.get(COL_CATEGORY)?.to_string(),
                name: record.get(COL_NAME)?.to_string(),
                tech_node: (!tech_node.is_empty()).then(|| tech_node.to_string()),
                size: record.get(COL_SIZE)?.to_string(),
            })
        })
        .collect()
}

/// Append each part to its tech node, returning the parts that have none.
///
/// A part goes to a node only when its `tech_node` names an existing node;
/// everything else is returned in catalog order. Every part ends up in
/// exactly one place.
pub fn assign_parts(tree: &mut TechTree, parts: Vec<Part>) -> Vec<Part> {
    let mut unassigned = Vec::new();

    for part in parts {
        let target = part
            .tech_node
            .as_deref()
            .and_then(|name| tree.get_mut(name));
        match target {
            Some(node) => node.parts.push(part),
            None => unassigned.push(part),
        }
    }

    debug!(
        "assign_parts: {} assigned, {} unassigned",
        tree.assigned_part_count(),
        unassigned.len()
    );
    unassigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TREE_HEADER: &str = "Node\tTier\tDescription\tPrerequisites\n";
    const PARTS_HEADER: &str = "Category\tName\tTech Node\tSize\n";

    fn tree_from(rows: &str) -> DomainResult<TechTree> {
        build_tech_tree(&Table::parse(&format!("{TREE_HEADER}{rows}")).unwrap())
    }

    fn parts_from(rows: &str) -> Vec<Part> {
        parse_parts(&Table::parse(&format!("{PARTS_HEADER}{rows}")).unwrap()).unwrap()
    }

    #[rstest]
    #[case("", vec![])]
    #[case("A", vec!["A"])]
    #[case(" A , B ,, ", vec!["A", "B"])]
    #[case(",,", vec![])]
    #[case("Basic Rocketry,  Engines", vec!["Basic Rocketry", "Engines"])]
    fn given_prerequisite_text_when_splitting_then_trims_and_drops_empty(
        #[case] raw: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(split_prerequisites(raw), expected);
    }

    #[test]
    fn given_rows_when_building_then_creates_nodes_with_empty_parts() {
        let tree = tree_from("A\t0\tStart\t\nB\t1\tNext\tA\n").unwrap();

        assert_eq!(tree.len(), 2);
        let b = tree.get("B").unwrap();
        assert_eq!(b.tier, 1);
        assert_eq!(b.description, "Next");
        assert_eq!(b.prerequisites, vec!["A".to_string()]);
        assert!(b.parts.is_empty());
    }

    #[rstest]
    #[case(" 2 ", 2)]
    #[case("-1", -1)]
    #[case("+3", 3)]
    fn given_numeric_tier_when_building_then_parses(#[case] raw: &str, #[case] tier: i64) {
        let tree = tree_from(&format!("A\t{raw}\t\t\n")).unwrap();

        assert_eq!(tree.get("A").unwrap().tier, tier);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1.5")]
    fn given_non_numeric_tier_when_building_then_fails_with_line(#[case] raw: &str) {
        let err = tree_from(&format!("A\t0\t\t\nB\t{raw}\t\t\n")).unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidTier {
                line: 3,
                value: raw.to_string()
            }
        );
    }

    #[test]
    fn given_duplicate_node_when_building_then_fails_instead_of_overwriting() {
        let err = tree_from("A\t0\t\t\nA\t1\t\t\n").unwrap_err();

        assert_eq!(
            err,
            DomainError::DuplicateNode {
                line: 3,
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn given_table_without_prerequisites_column_when_building_then_missing_column() {
        let table = Table::parse("Node\tTier\tDescription\nA\t0\tx\n").unwrap();

        let err = build_tech_tree(&table).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingColumn { line: 2, ref column } if column == "Prerequisites"
        ));
    }

    #[test]
    fn given_tech_node_with_spaces_when_parsing_parts_then_trims_and_normalizes_empty() {
        let parts = parts_from("Engine\tE1\t  A \tSmall\nFuel\tF1\t   \t\n");

        assert_eq!(parts[0].tech_node.as_deref(), Some("A"));
        assert_eq!(parts[1].tech_node, None);
        assert_eq!(parts[1].size, "");
    }

    #[test]
    fn given_parts_when_assigning_then_partitions_without_dropping() {
        let mut tree = tree_from("A\t0\t\t\nB\t1\t\tA\n").unwrap();
        let parts = parts_from(
            "Engine\tE1\tA\tSmall\nFuel\tF1\t\t\nEngine\tE2\tA\t\nHull\tH1\tNope\tLarge\n",
        );
        let input = parts.clone();

        let unassigned = assign_parts(&mut tree, parts);

        let a_names: Vec<_> = tree
            .get("A")
            .unwrap()
            .parts
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(a_names, vec!["E1", "E2"]);
        assert!(tree.get("B").unwrap().parts.is_empty());
        let un_names: Vec<_> = unassigned.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(un_names, vec!["F1", "H1"]);

        let mut all: Vec<Part> = tree.iter().flat_map(|n| n.parts.clone()).collect();
        all.extend(unassigned);
        all.sort_by(|a, b| a.name.cmp(&b.name));
        let mut expected = input;
        expected.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(all, expected);
    }
}
