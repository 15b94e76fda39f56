//! Navigation index: live forest plus recycle bin, with queries and
//! structural mutations.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info, instrument};

use crate::domain::arena::{Forest, NavigationNode};
use crate::domain::builder::ForestBuilder;
use crate::domain::entities::{ContentKey, ContentTypeKey, NavigationRow};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::keys::{KeyGenerator, RandomKeyGenerator};
use crate::domain::render::TreeDisplay;

/// In-memory mirror of the content hierarchy.
///
/// A key lives in exactly one of the two forests. Mutators validate every
/// precondition before touching either forest, so an `Err` leaves the index
/// unchanged. Mutators take `&mut self`; the surrounding system serializes
/// writers, concurrent readers are fine while no mutation is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationIndex {
    live: Forest,
    bin: Forest,
}

fn rejected<T>(operation: &str, error: DomainError) -> DomainResult<T> {
    debug!("{} rejected: {}", operation, error);
    Err(error)
}

impl NavigationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> &Forest {
        &self.live
    }

    pub fn bin(&self) -> &Forest {
        &self.bin
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// No live nodes; the bin may still hold some (see [`bin_len`](Self::bin_len)).
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn bin_len(&self) -> usize {
        self.bin.len()
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.live.contains(key)
    }

    pub fn contains_in_bin(&self, key: &ContentKey) -> bool {
        self.bin.contains(key)
    }

    fn exists(&self, key: &ContentKey) -> bool {
        self.live.contains(key) || self.bin.contains(key)
    }

    fn ensure_live_parent(&self, parent: Option<ContentKey>) -> DomainResult<()> {
        match parent {
            Some(p) if !self.live.contains(&p) => Err(DomainError::ParentNotFound(p)),
            _ => Ok(()),
        }
    }

    // Live queries

    /// `None` if absent; `Some(None)` for a root.
    pub fn parent_key(&self, key: &ContentKey) -> Option<Option<ContentKey>> {
        self.live.parent_key(key)
    }

    pub fn root_keys(&self) -> Vec<ContentKey> {
        self.live.roots().to_vec()
    }

    pub fn children_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.live.children_keys(key)
    }

    /// Full subtree below `key` in pre-order.
    pub fn descendants_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.live.descendants_keys(key)
    }

    /// Nearest ancestor first, root last.
    pub fn ancestors_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.live.ancestors_keys(key)
    }

    pub fn siblings_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.live.siblings_keys(key)
    }

    /// Depth of `key`, roots being level 1.
    pub fn level(&self, key: &ContentKey) -> Option<usize> {
        self.live.level(key)
    }

    pub fn root_keys_of_type(&self, content_type: &ContentTypeKey) -> Vec<ContentKey> {
        self.live.retain_of_type(self.root_keys(), content_type)
    }

    pub fn children_keys_of_type(
        &self,
        key: &ContentKey,
        content_type: &ContentTypeKey,
    ) -> Option<Vec<ContentKey>> {
        self.children_keys(key)
            .map(|keys| self.live.retain_of_type(keys, content_type))
    }

    pub fn descendants_keys_of_type(
        &self,
        key: &ContentKey,
        content_type: &ContentTypeKey,
    ) -> Option<Vec<ContentKey>> {
        self.descendants_keys(key)
            .map(|keys| self.live.retain_of_type(keys, content_type))
    }

    pub fn ancestors_keys_of_type(
        &self,
        key: &ContentKey,
        content_type: &ContentTypeKey,
    ) -> Option<Vec<ContentKey>> {
        self.ancestors_keys(key)
            .map(|keys| self.live.retain_of_type(keys, content_type))
    }

    pub fn siblings_keys_of_type(
        &self,
        key: &ContentKey,
        content_type: &ContentTypeKey,
    ) -> Option<Vec<ContentKey>> {
        self.siblings_keys(key)
            .map(|keys| self.live.retain_of_type(keys, content_type))
    }

    // Recycle bin queries

    pub fn parent_key_in_bin(&self, key: &ContentKey) -> Option<Option<ContentKey>> {
        self.bin.parent_key(key)
    }

    pub fn root_keys_in_bin(&self) -> Vec<ContentKey> {
        self.bin.roots().to_vec()
    }

    pub fn children_keys_in_bin(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.bin.children_keys(key)
    }

    pub fn descendants_keys_in_bin(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.bin.descendants_keys(key)
    }

    pub fn ancestors_keys_in_bin(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.bin.ancestors_keys(key)
    }

    pub fn siblings_keys_in_bin(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.bin.siblings_keys(key)
    }

    pub fn level_in_bin(&self, key: &ContentKey) -> Option<usize> {
        self.bin.level(key)
    }

    // Mutators

    /// Add a new live node, appended as the last child of `parent` (or the
    /// last root).
    pub fn add(&mut self, key: ContentKey, parent: Option<ContentKey>) -> DomainResult<()> {
        self.insert_new(key, None, parent)
    }

    /// Same as [`add`](Self::add), recording the node's content type.
    pub fn add_of_type(
        &mut self,
        key: ContentKey,
        content_type: ContentTypeKey,
        parent: Option<ContentKey>,
    ) -> DomainResult<()> {
        self.insert_new(key, Some(content_type), parent)
    }

    #[instrument(level = "debug", skip(self))]
    fn insert_new(
        &mut self,
        key: ContentKey,
        content_type: Option<ContentTypeKey>,
        parent: Option<ContentKey>,
    ) -> DomainResult<()> {
        if self.exists(&key) {
            return rejected("add", DomainError::DuplicateKey(key));
        }
        if let Err(e) = self.ensure_live_parent(parent) {
            return rejected("add", e);
        }
        self.live.insert_node(key, parent, content_type);
        Ok(())
    }

    /// Soft-delete `key` with its whole subtree; it becomes the last bin root.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: &ContentKey) -> DomainResult<()> {
        let Some(subtree) = self.live.take_subtree(*key) else {
            return rejected("remove", DomainError::NotFound(*key));
        };
        debug!("remove: {} nodes to recycle bin", subtree.len());
        self.bin.graft(subtree, None);
        Ok(())
    }

    /// Re-hang the subtree at `key` as the last child of `target` (or the
    /// last root). Moving under itself or any of its descendants is refused.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, key: &ContentKey, target: Option<ContentKey>) -> DomainResult<()> {
        if !self.live.contains(key) {
            return rejected("move", DomainError::NotFound(*key));
        }
        if let Err(e) = self.ensure_live_parent(target) {
            return rejected("move", e);
        }
        if let Some(t) = target {
            if t == *key {
                return rejected("move", DomainError::SelfReference(*key));
            }
            if self.live.iter_ancestors(&t).any(|ancestor| ancestor == *key) {
                return rejected("move", DomainError::CycleDetected { key: *key, target: t });
            }
        }
        self.live.reparent(*key, target);
        Ok(())
    }

    /// Deep-clone the subtree at `key` under `target` with random keys.
    /// Returns the key of the cloned root.
    pub fn copy(&mut self, key: &ContentKey, target: Option<ContentKey>) -> DomainResult<ContentKey> {
        self.copy_with(key, target, &mut RandomKeyGenerator)
    }

    /// Deep-clone the subtree at `key` under `target`, drawing one fresh key
    /// per cloned node from `keys`. The source subtree is left untouched and
    /// the target may lie inside it.
    #[instrument(level = "debug", skip(self, keys))]
    pub fn copy_with(
        &mut self,
        key: &ContentKey,
        target: Option<ContentKey>,
        keys: &mut dyn KeyGenerator,
    ) -> DomainResult<ContentKey> {
        if !self.live.contains(key) {
            return rejected("copy", DomainError::NotFound(*key));
        }
        if let Err(e) = self.ensure_live_parent(target) {
            return rejected("copy", e);
        }

        let source: Vec<ContentKey> = std::iter::once(*key)
            .chain(self.live.iter_descendants(key))
            .collect();

        let mut mapping = HashMap::with_capacity(source.len());
        let mut issued = HashSet::with_capacity(source.len());
        for old in &source {
            let fresh = keys.next_key();
            if self.exists(&fresh) || !issued.insert(fresh) {
                return rejected("copy", DomainError::DuplicateKey(fresh));
            }
            mapping.insert(*old, fresh);
        }

        // Snapshot all clones before inserting so a target inside the source
        // subtree does not leak into the copy.
        let mut clones = Vec::with_capacity(source.len());
        let mut cloned_root = None;
        for old in &source {
            let (Some(node), Some(&fresh)) = (self.live.get_node(old), mapping.get(old)) else {
                continue;
            };
            let parent = if old == key {
                cloned_root = Some(fresh);
                target
            } else {
                node.parent.and_then(|p| mapping.get(&p).copied())
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| mapping.get(child).copied())
                .collect();
            clones.push((
                fresh,
                NavigationNode {
                    parent,
                    children,
                    content_type: node.content_type,
                },
            ));
        }

        let Some(cloned_root) = cloned_root else {
            return rejected("copy", DomainError::NotFound(*key));
        };
        debug!("copy: cloned {} nodes as {}", clones.len(), cloned_root);
        for (fresh, node) in clones {
            self.live.insert_unlinked(fresh, node);
        }
        self.live.link(cloned_root);
        Ok(cloned_root)
    }

    /// Bring `key` and its bin subtree back into the live forest as the last
    /// child of `target` (or the last root), shape preserved.
    #[instrument(level = "debug", skip(self))]
    pub fn restore_from_bin(
        &mut self,
        key: &ContentKey,
        target: Option<ContentKey>,
    ) -> DomainResult<()> {
        if !self.bin.contains(key) {
            return rejected("restore", DomainError::NotInBin(*key));
        }
        if let Err(e) = self.ensure_live_parent(target) {
            return rejected("restore", e);
        }
        let Some(subtree) = self.bin.take_subtree(*key) else {
            return rejected("restore", DomainError::NotInBin(*key));
        };
        debug!("restore: {} nodes from recycle bin", subtree.len());
        self.live.graft(subtree, target);
        Ok(())
    }

    // Rebuild

    /// Replace both forests with the ones described by `rows`, using the
    /// default root sentinel.
    pub fn rebuild(&mut self, rows: &[NavigationRow]) -> DomainResult<()> {
        self.rebuild_with(&ForestBuilder::default(), rows)
    }

    /// Replace both forests with the ones `builder` produces from `rows`.
    /// On error the previous forests are kept.
    pub fn rebuild_with(&mut self, builder: &ForestBuilder, rows: &[NavigationRow]) -> DomainResult<()> {
        let built = builder.build(rows)?;
        self.live = built.live;
        self.bin = built.bin;
        info!(
            "rebuild: live={} bin={}",
            self.live.len(),
            self.bin.len()
        );
        Ok(())
    }
}

impl fmt::Display for NavigationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.live.to_tree("live"))?;
        write!(f, "{}", self.bin.to_tree("bin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keys::SequentialKeyGenerator;
    use uuid::Uuid;

    fn key(n: u128) -> ContentKey {
        Uuid::from_u128(n)
    }

    fn chain() -> NavigationIndex {
        let mut index = NavigationIndex::new();
        index.add(key(1), None).unwrap();
        index.add(key(2), Some(key(1))).unwrap();
        index.add(key(3), Some(key(2))).unwrap();
        index
    }

    #[test]
    fn given_move_under_descendant_when_moving_then_refuses_without_change() {
        let mut index = chain();
        let before = index.clone();

        let result = index.move_node(&key(1), Some(key(3)));

        assert_eq!(
            result,
            Err(DomainError::CycleDetected {
                key: key(1),
                target: key(3)
            })
        );
        assert_eq!(index, before);
    }

    #[test]
    fn given_generator_repeating_keys_when_copying_then_refuses_without_change() {
        struct Stuck;
        impl KeyGenerator for Stuck {
            fn next_key(&mut self) -> ContentKey {
                Uuid::from_u128(99)
            }
        }
        let mut index = chain();
        let before = index.clone();

        let result = index.copy_with(&key(1), None, &mut Stuck);

        assert_eq!(result, Err(DomainError::DuplicateKey(key(99))));
        assert_eq!(index, before);
    }

    #[test]
    fn given_generator_returning_existing_key_when_copying_then_refuses() {
        let mut index = chain();
        let mut gen = SequentialKeyGenerator::starting_at(3);

        assert_eq!(
            index.copy_with(&key(1), None, &mut gen),
            Err(DomainError::DuplicateKey(key(3)))
        );
    }

    #[test]
    fn given_copy_into_own_leaf_when_copying_then_clone_is_finite() {
        let mut index = chain();
        let mut gen = SequentialKeyGenerator::starting_at(10);

        let copied = index.copy_with(&key(1), Some(key(3)), &mut gen).unwrap();

        assert_eq!(copied, key(10));
        assert_eq!(index.children_keys(&key(3)), Some(vec![key(10)]));
        assert_eq!(index.descendants_keys(&key(10)), Some(vec![key(11), key(12)]));
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn given_index_when_displaying_then_renders_both_forests() {
        let mut index = chain();
        index.remove(&key(3)).unwrap();

        let rendered = index.to_string();

        assert!(rendered.starts_with("live"));
        assert!(rendered.contains("bin"));
        assert!(rendered.contains(&key(3).to_string()));
    }
}
