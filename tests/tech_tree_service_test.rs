//! Tests for TechTreeService

use std::path::Path;
use std::sync::{Arc, Mutex};

use rstest::rstest;
use tempfile::TempDir;

use techtree::application::services::TechTreeService;
use techtree::application::{ApplicationError, DataSource};
use techtree::domain::DomainError;
use techtree::infrastructure::traits::{Fetcher, RealFileSystem};
use techtree::util::testing;

const TECH_TREE: &str = "Node\tTier\tDescription\tPrerequisites\nA\t0\tstart\t\nB\t1\tnext\tA\n";
const PARTS: &str = "Category\tName\tTech Node\tSize\nEngine\tE1\tA\tSmall\nFuel\tF1\t\t\n";

/// Fetcher serving fixed bodies and recording requested URLs.
#[derive(Default)]
struct MockFetcher {
    responses: Vec<(String, Result<String, String>)>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn with(mut self, url: &str, response: Result<&str, &str>) -> Self {
        self.responses.push((
            url.to_string(),
            response.map(str::to_string).map_err(str::to_string),
        ));
        self
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.responses
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| Err(format!("no route to {url}")))
    }
}

fn service(fetcher: MockFetcher) -> TechTreeService {
    TechTreeService::new(Arc::new(RealFileSystem), Arc::new(fetcher))
}

fn inline(text: &str) -> DataSource {
    DataSource::Inline(text.to_string())
}

// ============================================================
// assemble() tests
// ============================================================

#[test]
fn given_inline_tables_when_assemble_then_joins_parts_to_nodes() {
    testing::init_test_setup();
    let service = service(MockFetcher::default());

    let assignment = service.assemble(&inline(TECH_TREE), &inline(PARTS)).unwrap();

    assert_eq!(assignment.tree.len(), 2);
    assert_eq!(assignment.part_count, 2);
    let a = assignment.tree.get("A").unwrap();
    assert_eq!(a.parts.len(), 1);
    assert_eq!(a.parts[0].name, "E1");
    assert!(assignment.tree.get("B").unwrap().parts.is_empty());
    assert_eq!(assignment.unassigned.len(), 1);
    assert_eq!(assignment.unassigned[0].name, "F1");
}

#[test]
fn given_files_when_assemble_then_reads_from_disk() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let tree_path = temp.path().join("tree.tsv");
    let parts_path = temp.path().join("parts.tsv");
    std::fs::write(&tree_path, TECH_TREE).unwrap();
    std::fs::write(&parts_path, PARTS).unwrap();
    let service = service(MockFetcher::default());

    let tree_source = service.probe("tree.tsv", temp.path());
    let parts_source = service.probe(&parts_path.to_string_lossy(), Path::new("/elsewhere"));
    assert_eq!(tree_source, DataSource::Path(tree_path.clone()));

    let assignment = service.assemble(&tree_source, &parts_source).unwrap();
    assert_eq!(assignment.tree.len(), 2);
    assert_eq!(assignment.unassigned.len(), 1);
}

#[test]
fn given_remote_sources_when_assemble_then_fetches_each_url() {
    testing::init_test_setup();
    let fetcher = MockFetcher::default()
        .with("https://sheets/tree", Ok(TECH_TREE))
        .with("https://sheets/parts", Ok(PARTS));
    let service = service(fetcher);

    let assignment = service
        .assemble(
            &DataSource::Remote("https://sheets/tree".into()),
            &DataSource::Remote("https://sheets/parts".into()),
        )
        .unwrap();

    assert_eq!(assignment.tree.len(), 2);
    assert_eq!(assignment.part_count, 2);
}

#[test]
fn given_unreachable_url_when_assemble_then_fetch_error() {
    testing::init_test_setup();
    let fetcher = MockFetcher::default().with("https://sheets/tree", Err("connection refused"));
    let service = service(fetcher);

    let err = service
        .assemble(&DataSource::Remote("https://sheets/tree".into()), &inline(PARTS))
        .unwrap_err();

    match err {
        ApplicationError::Fetch { url, message } => {
            assert_eq!(url, "https://sheets/tree");
            assert_eq!(message, "connection refused");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[test]
fn given_missing_file_when_reading_then_operation_failed() {
    let service = service(MockFetcher::default());

    let err = service
        .read_source(&DataSource::Path(Path::new("/no/such/tree.tsv").into()))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("/no/such/tree.tsv"));
}

#[rstest]
#[case::bad_tier(
    "Node\tTier\tDescription\tPrerequisites\nA\t0\t\t\nB\tabc\t\tA\n",
    DomainError::InvalidTier { line: 3, value: "abc".into() }
)]
#[case::duplicate(
    "Node\tTier\tDescription\tPrerequisites\nA\t0\t\t\nA\t1\t\t\n",
    DomainError::DuplicateNode { line: 3, name: "A".into() }
)]
#[case::missing_column(
    "Node\tTier\tDescription\nA\t0\t\n",
    DomainError::MissingColumn { line: 2, column: "Prerequisites".into() }
)]
fn given_malformed_tech_tree_when_assemble_then_format_error_names_table(
    #[case] text: &str,
    #[case] expected: DomainError,
) {
    let service = service(MockFetcher::default());

    let err = service.assemble(&inline(text), &inline(PARTS)).unwrap_err();

    match err {
        ApplicationError::Format { table, source } => {
            assert_eq!(table, "tech tree");
            assert_eq!(source, expected);
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn given_parts_without_size_column_when_assemble_then_format_error_names_parts() {
    let service = service(MockFetcher::default());

    let err = service
        .assemble(&inline(TECH_TREE), &inline("Category\tName\tTech Node\nFuel\tF1\t\n"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Format { ref table, .. } if table == "parts catalog"
    ));
}

#[test]
fn given_dangling_prerequisite_when_assemble_then_keeps_reference() {
    let service = service(MockFetcher::default());
    let tree = "Node\tTier\tDescription\tPrerequisites\nA\t0\t\t\nB\t1\t\tA, Z\n";

    let assignment = service.assemble(&inline(tree), &inline(PARTS)).unwrap();

    assert_eq!(
        assignment.tree.get("B").unwrap().prerequisites,
        vec!["A".to_string(), "Z".to_string()]
    );
    assert_eq!(assignment.tree.dangling_prerequisites(), vec![("B", "Z")]);
}
