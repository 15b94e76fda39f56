//! Shared fixture: a small content tree loaded through rebuild.
//!
//! ```text
//! Root
//! ├── Child1
//! │   ├── Grandchild1
//! │   └── Grandchild2
//! ├── Child2
//! │   └── Grandchild3
//! │       └── GreatGrandchild1
//! └── Child3
//!     └── Grandchild4
//! ```

#![allow(dead_code)]

use navindex::domain::{
    ContentKey, ContentTypeKey, NavigationIndex, NavigationRow, ROOT_PARENT_ID,
};
use rstest::fixture;
use uuid::Uuid;

pub const ROOT: ContentKey = Uuid::from_u128(1);
pub const CHILD1: ContentKey = Uuid::from_u128(2);
pub const GRANDCHILD1: ContentKey = Uuid::from_u128(3);
pub const GRANDCHILD2: ContentKey = Uuid::from_u128(4);
pub const CHILD2: ContentKey = Uuid::from_u128(5);
pub const GRANDCHILD3: ContentKey = Uuid::from_u128(6);
pub const GREAT_GRANDCHILD1: ContentKey = Uuid::from_u128(7);
pub const CHILD3: ContentKey = Uuid::from_u128(8);
pub const GRANDCHILD4: ContentKey = Uuid::from_u128(9);

/// Key that is never part of the fixture.
pub const UNKNOWN: ContentKey = Uuid::from_u128(0xdead);

pub const HOME_PAGE: ContentTypeKey = Uuid::from_u128(0xa0);
pub const SECTION: ContentTypeKey = Uuid::from_u128(0xa1);
pub const ARTICLE: ContentTypeKey = Uuid::from_u128(0xa2);

/// Rows in repository order; row id equals the key's numeric value.
pub fn tree_rows() -> Vec<NavigationRow> {
    let row = |key: ContentKey, parent_id: i64, ty: ContentTypeKey| {
        NavigationRow::new(key, key.as_u128() as i64, parent_id).of_type(ty)
    };
    vec![
        row(ROOT, ROOT_PARENT_ID, HOME_PAGE),
        row(CHILD1, 1, SECTION),
        row(GRANDCHILD1, 2, ARTICLE),
        row(GRANDCHILD2, 2, ARTICLE),
        row(CHILD2, 1, SECTION),
        row(GRANDCHILD3, 5, SECTION),
        row(GREAT_GRANDCHILD1, 6, ARTICLE),
        row(CHILD3, 1, SECTION),
        row(GRANDCHILD4, 8, ARTICLE),
    ]
}

#[fixture]
pub fn index() -> NavigationIndex {
    navindex::util::testing::init_test_setup();
    let mut index = NavigationIndex::new();
    index.rebuild(&tree_rows()).expect("fixture rows are valid");
    index
}

/// Every live node in pre-order with its parent and children.
pub fn snapshot(index: &NavigationIndex) -> Vec<(ContentKey, Option<ContentKey>, Vec<ContentKey>)> {
    index
        .live()
        .iter()
        .map(|key| {
            (
                key,
                index.parent_key(&key).flatten(),
                index.children_keys(&key).unwrap_or_default(),
            )
        })
        .collect()
}
