//! Tests for rebuilding the index from repository rows

mod common;

use common::*;
use navindex::domain::{
    DomainError, ForestBuilder, NavigationIndex, NavigationRow, ROOT_PARENT_ID,
};
use rstest::rstest;
use uuid::Uuid;

fn key(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn row(n: u128, parent_id: i64) -> NavigationRow {
    NavigationRow::new(key(n), n as i64, parent_id)
}

#[test]
fn given_fixture_rows_when_rebuilding_then_row_order_is_sibling_order() {
    let mut index = NavigationIndex::new();

    index.rebuild(&tree_rows()).unwrap();

    assert_eq!(index.root_keys(), vec![ROOT]);
    assert_eq!(index.children_keys(&ROOT), Some(vec![CHILD1, CHILD2, CHILD3]));
    assert_eq!(index.len(), 9);
    assert_eq!(index.bin_len(), 0);
}

#[test]
fn given_reversed_sibling_rows_when_rebuilding_then_order_follows_rows() {
    let rows = vec![row(1, ROOT_PARENT_ID), row(4, 1), row(3, 1), row(2, 1)];
    let mut index = NavigationIndex::new();

    index.rebuild(&rows).unwrap();

    assert_eq!(index.children_keys(&key(1)), Some(vec![key(4), key(3), key(2)]));
}

#[test]
fn given_several_root_rows_when_rebuilding_then_roots_keep_row_order() {
    let rows = vec![row(3, ROOT_PARENT_ID), row(1, ROOT_PARENT_ID), row(2, 3)];
    let mut index = NavigationIndex::new();

    index.rebuild(&rows).unwrap();

    assert_eq!(index.root_keys(), vec![key(3), key(1)]);
}

#[test]
fn given_trashed_rows_when_rebuilding_then_they_form_the_bin() {
    // Arrange: 2 is trashed under live 1, 3 is trashed under trashed 2
    let rows = vec![
        row(1, ROOT_PARENT_ID),
        row(2, 1).trashed(),
        row(3, 2).trashed(),
        row(4, ROOT_PARENT_ID).trashed(),
    ];
    let mut index = NavigationIndex::new();

    // Act
    index.rebuild(&rows).unwrap();

    // Assert
    assert_eq!(index.children_keys(&key(1)), Some(vec![]));
    assert_eq!(index.root_keys_in_bin(), vec![key(2), key(4)]);
    assert_eq!(index.parent_key_in_bin(&key(3)), Some(Some(key(2))));
    assert_eq!(index.parent_key(&key(2)), None);
}

#[test]
fn given_orphan_rows_when_rebuilding_then_orphans_become_bin_roots() {
    // 2 points at a row that does not exist; 3 hangs below the orphan
    let rows = vec![row(1, ROOT_PARENT_ID), row(2, 99), row(3, 2)];
    let mut index = NavigationIndex::new();

    index.rebuild(&rows).unwrap();

    assert_eq!(index.root_keys(), vec![key(1)]);
    assert_eq!(index.root_keys_in_bin(), vec![key(2)]);
    assert_eq!(index.descendants_keys_in_bin(&key(2)), Some(vec![key(3)]));
}

#[test]
fn given_typed_rows_when_rebuilding_then_types_are_kept() {
    let ty = key(0xa0);
    let rows = vec![row(1, ROOT_PARENT_ID), row(2, 1).of_type(ty), row(3, 1)];
    let mut index = NavigationIndex::new();

    index.rebuild(&rows).unwrap();

    assert_eq!(index.children_keys_of_type(&key(1), &ty), Some(vec![key(2)]));
}

#[test]
fn given_custom_root_sentinel_when_rebuilding_then_recognizes_roots() {
    let rows = vec![row(1, 0), row(2, 1)];
    let mut index = NavigationIndex::new();

    index.rebuild_with(&ForestBuilder::new(0), &rows).unwrap();

    assert_eq!(index.root_keys(), vec![key(1)]);
    assert_eq!(index.level(&key(2)), Some(2));
}

// ============================================================
// Replacement and failure
// ============================================================

#[rstest]
fn given_mutated_index_when_rebuilding_then_replaces_both_forests(mut index: NavigationIndex) {
    index.remove(&CHILD1).unwrap();
    index.add(Uuid::new_v4(), Some(CHILD2)).unwrap();

    index.rebuild(&[row(50, ROOT_PARENT_ID)]).unwrap();

    assert_eq!(index.root_keys(), vec![key(50)]);
    assert!(!index.contains(&ROOT));
    assert!(index.root_keys_in_bin().is_empty());
}

#[rstest]
#[case::duplicate_key(
    vec![row(1, ROOT_PARENT_ID), NavigationRow::new(key(1), 2, ROOT_PARENT_ID)],
    DomainError::DuplicateRow(key(1))
)]
#[case::duplicate_id(
    vec![row(1, ROOT_PARENT_ID), NavigationRow::new(key(2), 1, ROOT_PARENT_ID)],
    DomainError::DuplicateRowId(1)
)]
#[case::parent_cycle(vec![row(1, 2), row(2, 1)], DomainError::RowCycle(key(1)))]
#[case::self_parent(vec![row(1, ROOT_PARENT_ID), row(2, 2)], DomainError::RowCycle(key(2)))]
fn given_invalid_rows_when_rebuilding_then_keeps_previous_snapshot(
    mut index: NavigationIndex,
    #[case] rows: Vec<NavigationRow>,
    #[case] expected: DomainError,
) {
    let before = index.clone();

    let result = index.rebuild(&rows);

    assert_eq!(result, Err(expected));
    assert_eq!(index, before);
}

#[test]
fn given_empty_rows_when_rebuilding_then_index_is_empty() {
    let mut index = NavigationIndex::new();
    index.add(key(1), None).unwrap();

    index.rebuild(&[]).unwrap();

    assert!(index.is_empty());
}
