//! Scenario Tests for TreeBuilder
//!
//! Each test runs against a fresh libsql database in a temporary directory.

use crate::db::{DatabaseError, DatabaseService, LibsqlStore, NodeStore};
use crate::models::{NewNode, NodeWithChildCount, PathError, PathPolicy, TreeNode};
use crate::services::{TreeBuilder, TreeError, TreeReader};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Helper to create test services
async fn create_test_services() -> (Arc<TreeBuilder>, Arc<dyn NodeStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
    let store: Arc<dyn NodeStore> = Arc::new(LibsqlStore::new(db));
    let builder = Arc::new(TreeBuilder::new(store.clone()));

    (builder, store, temp_dir)
}

async fn node_at(store: &Arc<dyn NodeStore>, path: &str) -> TreeNode {
    store
        .find_by_full_position(path)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("no node at {}", path))
}

#[tokio::test]
async fn test_insert_into_empty_store_creates_placeholder_ancestors() {
    let (builder, store, _temp) = create_test_services().await;

    let id = builder.insert("1.4.2", "Chapter", "Text").await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 3);

    let root = node_at(&store, "1").await;
    assert_eq!(root.position, 1);
    assert_eq!(root.parent, None);
    assert!(root.is_placeholder());

    let middle = node_at(&store, "1.4").await;
    assert_eq!(middle.position, 4);
    assert_eq!(middle.parent, Some(root.id));
    assert!(middle.is_placeholder());

    let leaf = node_at(&store, "1.4.2").await;
    assert_eq!(leaf.id, id);
    assert_eq!(leaf.position, 2);
    assert_eq!(leaf.parent, Some(middle.id));
    assert_eq!(leaf.title.as_deref(), Some("Chapter"));
    assert_eq!(leaf.value.as_deref(), Some("Text"));
}

#[tokio::test]
async fn test_insert_ancestor_later_promotes_placeholder_in_place() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert("1.4.2", "Leaf", "l").await.unwrap();
    let placeholder_id = node_at(&store, "1").await.id;

    let id = builder.insert("1", "Root", "r").await.unwrap();

    assert_eq!(id, placeholder_id);
    assert_eq!(store.list_all().await.unwrap().len(), 3);

    let root = node_at(&store, "1").await;
    assert_eq!(root.title.as_deref(), Some("Root"));
    assert_eq!(root.value.as_deref(), Some("r"));
    assert_eq!(root.parent, None);
}

#[tokio::test]
async fn test_duplicate_insert_rejected_without_changes() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert("1.4.2", "Leaf", "l").await.unwrap();
    let before = store.list_all().await.unwrap();

    let err = builder.insert("1.4.2", "Leaf", "l").await.unwrap_err();
    assert!(
        matches!(err, TreeError::IncorrectData { ref full_position } if full_position == "1.4.2"),
        "unexpected error: {:?}",
        err
    );

    let err = builder.insert("1.4.2", "Other", "x").await.unwrap_err();
    assert!(matches!(err, TreeError::IncorrectData { .. }));

    assert_eq!(store.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_siblings_share_placeholder_ancestors() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert("1.4.2", "A", "a").await.unwrap();
    builder.insert("1.4.9", "B", "b").await.unwrap();

    let all = store.list_all().await.unwrap();
    let paths: Vec<&str> = all.iter().map(|n| n.full_position.as_str()).collect();
    assert_eq!(paths, ["1", "1.4", "1.4.2", "1.4.9"]);

    let middle = node_at(&store, "1.4").await;
    assert_eq!(node_at(&store, "1.4.2").await.parent, Some(middle.id));
    assert_eq!(node_at(&store, "1.4.9").await.parent, Some(middle.id));
}

#[tokio::test]
async fn test_existing_materialized_ancestor_untouched() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert("1", "Root", "r").await.unwrap();
    builder.insert("1.4", "Mid", "m").await.unwrap();
    builder.insert("1.4.2", "Leaf", "l").await.unwrap();

    let root = node_at(&store, "1").await;
    assert_eq!(root.title.as_deref(), Some("Root"));
    let middle = node_at(&store, "1.4").await;
    assert_eq!(middle.title.as_deref(), Some("Mid"));
    assert_eq!(middle.parent, Some(root.id));
    assert_eq!(store.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_invalid_path_writes_nothing() {
    let (builder, store, _temp) = create_test_services().await;

    let err = builder.insert("1.x.2", "t", "v").await.unwrap_err();
    assert!(matches!(
        err,
        TreeError::InvalidPath(PathError::InvalidSegment { index: 1, .. })
    ));

    let err = builder.insert("..", "t", "v").await.unwrap_err();
    assert!(matches!(err, TreeError::InvalidPath(PathError::Empty)));

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lenient_policy_coerces_segments() {
    let (_builder, store, _temp) = create_test_services().await;
    let builder = TreeBuilder::with_policy(store.clone(), PathPolicy::Lenient);
    assert_eq!(builder.policy(), PathPolicy::Lenient);

    builder.insert("1.x.2", "t", "v").await.unwrap();

    let leaf = node_at(&store, "1.0.2").await;
    assert_eq!(leaf.title.as_deref(), Some("t"));
    assert!(node_at(&store, "1.0").await.is_placeholder());
}

#[tokio::test]
async fn test_lenient_non_canonical_input_still_materializes_target() {
    let (_builder, store, _temp) = create_test_services().await;
    let builder = TreeBuilder::with_policy(store.clone(), PathPolicy::Lenient);

    builder.insert(".01.04.", "t", "v").await.unwrap();

    let target = node_at(&store, "1.4").await;
    assert!(target.is_materialized());
    assert_eq!(store.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_trimmed_path_targets_same_node() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert(".3.1.", "t", "v").await.unwrap();
    let err = builder.insert("3.1", "t", "v").await.unwrap_err();

    assert!(matches!(err, TreeError::IncorrectData { .. }));
    assert_eq!(store.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_strings_count_as_data() {
    let (builder, store, _temp) = create_test_services().await;

    builder.insert("5", "", "").await.unwrap();
    assert!(node_at(&store, "5").await.is_materialized());

    let err = builder.insert("5", "late", "late").await.unwrap_err();
    assert!(matches!(err, TreeError::IncorrectData { .. }));
}

#[tokio::test]
async fn test_repeated_promotion_attempts_have_single_winner() {
    let (builder, store, _temp) = create_test_services().await;
    builder.insert("1.4.2", "Leaf", "l").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let builder = builder.clone();
        handles.push(tokio::spawn(async move {
            builder
                .insert("1", &format!("Root {}", i), &format!("r{}", i))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(TreeError::Conflict { .. }) | Err(TreeError::IncorrectData { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.list_all().await.unwrap().len(), 3);
    assert!(node_at(&store, "1").await.is_materialized());
}

/// Store wrapper that replays a competing writer between the builder's read
/// and its write.
///
/// - Paths in `hidden` are reported absent once by `find_by_full_position`,
///   as if another writer inserted them right after our lookup.
/// - `fill_before_update` is written into the row by a "competing"
///   `update_if_empty` just before the builder's own update runs.
struct RacingStore {
    inner: Arc<dyn NodeStore>,
    hidden: Mutex<HashSet<String>>,
    fill_before_update: Mutex<Option<(String, String)>>,
}

impl RacingStore {
    fn new(inner: Arc<dyn NodeStore>) -> Self {
        Self {
            inner,
            hidden: Mutex::new(HashSet::new()),
            fill_before_update: Mutex::new(None),
        }
    }

    fn hide_once(&self, full_position: &str) {
        self.hidden.lock().unwrap().insert(full_position.to_string());
    }

    fn fill_before_update(&self, title: &str, value: &str) {
        *self.fill_before_update.lock().unwrap() = Some((title.to_string(), value.to_string()));
    }
}

#[async_trait]
impl NodeStore for RacingStore {
    async fn find_by_full_position(
        &self,
        full_position: &str,
    ) -> Result<Option<TreeNode>, DatabaseError> {
        let hide = self.hidden.lock().unwrap().remove(full_position);
        if hide {
            return Ok(None);
        }
        self.inner.find_by_full_position(full_position).await
    }

    async fn insert(&self, node: NewNode<'_>) -> Result<i64, DatabaseError> {
        self.inner.insert(node).await
    }

    async fn update_if_empty(
        &self,
        id: i64,
        title: &str,
        value: &str,
    ) -> Result<u64, DatabaseError> {
        let competing = self.fill_before_update.lock().unwrap().take();
        if let Some((other_title, other_value)) = competing {
            assert_eq!(
                self.inner
                    .update_if_empty(id, &other_title, &other_value)
                    .await?,
                1
            );
        }
        self.inner.update_if_empty(id, title, value).await
    }

    async fn list_children(
        &self,
        parent: Option<i64>,
    ) -> Result<Vec<NodeWithChildCount>, DatabaseError> {
        self.inner.list_children(parent).await
    }

    async fn list_all(&self) -> Result<Vec<TreeNode>, DatabaseError> {
        self.inner.list_all().await
    }
}

async fn create_racing_services() -> (TreeBuilder, Arc<RacingStore>, Arc<dyn NodeStore>, TempDir)
{
    let (_, store, temp_dir) = create_test_services().await;
    let racing = Arc::new(RacingStore::new(store.clone()));
    let builder = TreeBuilder::new(racing.clone());
    (builder, racing, store, temp_dir)
}

#[tokio::test]
async fn test_promotion_lost_to_concurrent_writer_is_conflict() {
    let (builder, racing, store, _temp) = create_racing_services().await;
    builder.insert("1.4.2", "Leaf", "l").await.unwrap();
    let root_id = node_at(&store, "1").await.id;

    racing.fill_before_update("Winner", "w");
    let err = builder.insert("1", "Loser", "x").await.unwrap_err();

    assert!(matches!(&err, TreeError::Conflict { full_position } if full_position == "1"));
    assert!(err.is_retryable());

    let root = node_at(&store, "1").await;
    assert_eq!(root.id, root_id);
    assert_eq!(root.title.as_deref(), Some("Winner"));
    assert_eq!(root.value.as_deref(), Some("w"));
    assert_eq!(store.list_all().await.unwrap().len(), 3);

    // A retry now sees the winner's data
    let err = builder.insert("1", "Loser", "x").await.unwrap_err();
    assert!(matches!(err, TreeError::IncorrectData { .. }));
}

#[tokio::test]
async fn test_target_inserted_concurrently_is_constraint_violation() {
    let (builder, racing, store, _temp) = create_racing_services().await;
    builder.insert("5", "First", "f").await.unwrap();

    racing.hide_once("5");
    let err = builder.insert("5", "Second", "s").await.unwrap_err();

    assert!(
        matches!(&err, TreeError::ConstraintViolation { full_position } if full_position == "5")
    );
    assert!(err.is_retryable());

    let node = node_at(&store, "5").await;
    assert_eq!(node.title.as_deref(), Some("First"));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ancestor_inserted_concurrently_is_reused() {
    let (builder, racing, store, _temp) = create_racing_services().await;
    builder.insert("3.1", "One", "1").await.unwrap();
    let ancestor = node_at(&store, "3").await;

    racing.hide_once("3");
    let id = builder.insert("3.2", "Two", "2").await.unwrap();

    let node = node_at(&store, "3.2").await;
    assert_eq!(node.id, id);
    assert_eq!(node.parent, Some(ancestor.id));
    assert!(node_at(&store, "3").await.is_placeholder());
    assert_eq!(store.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_inserts_of_new_subtrees() {
    let (builder, store, _temp) = create_test_services().await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let builder = builder.clone();
        handles.push(tokio::spawn(async move {
            builder.insert(&format!("7.3.{}", i), "t", "v").await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Shared ancestors exist exactly once
    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 2 + 6);
    let middle = node_at(&store, "7.3").await;
    let children = store.list_children(Some(middle.id)).await.unwrap();
    assert_eq!(children.len(), 6);
}

#[tokio::test]
async fn test_reader_sees_builder_writes() {
    let (builder, store, _temp) = create_test_services().await;
    let reader = TreeReader::new(store.clone());

    builder.insert("2", "Two", "2").await.unwrap();
    builder.insert("1.10", "Ten", "10").await.unwrap();
    builder.insert("1.2", "Two", "2").await.unwrap();

    let paths: Vec<String> = reader
        .get_full_tree()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.full_position)
        .collect();
    assert_eq!(paths, ["1", "1.2", "1.10", "2"]);

    let roots = reader.get_recursive_tree(None).await.unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].child_count, 2);
    assert_eq!(roots[1].child_count, 0);

    let found = reader.find(".1.10.").await.unwrap().unwrap();
    assert_eq!(found.title.as_deref(), Some("Ten"));
    assert!(reader.find("9").await.unwrap().is_none());
}
