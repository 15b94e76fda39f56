use std::collections::HashMap;

use tracing::instrument;

use crate::domain::entities::{ContentKey, ContentTypeKey};

/// Node record in a navigation forest.
///
/// Links are identifiers into the same forest, never references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationNode {
    /// Parent key, None for root nodes
    pub parent: Option<ContentKey>,
    /// Child keys in sibling order
    pub children: Vec<ContentKey>,
    /// Content type of the item, if known
    pub content_type: Option<ContentTypeKey>,
}

/// Flat map from key to node, supporting multiple ordered roots.
///
/// Every parent link points at a node of the same forest and every node is
/// listed exactly once, either in its parent's children or in `roots`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: HashMap<ContentKey, NavigationNode>,
    roots: Vec<ContentKey>,
}

/// A detached subtree in pre-order, root first.
#[derive(Debug)]
pub(crate) struct Subtree {
    nodes: Vec<(ContentKey, NavigationNode)>,
}

impl Subtree {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get_node(&self, key: &ContentKey) -> Option<&NavigationNode> {
        self.nodes.get(key)
    }

    /// Roots in creation order.
    pub fn roots(&self) -> &[ContentKey] {
        &self.roots
    }

    /// Pre-order walk over the whole forest, roots in order.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            forest: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Pre-order walk below `key`, excluding `key` itself.
    pub fn iter_descendants(&self, key: &ContentKey) -> Descendants<'_> {
        let stack = self
            .nodes
            .get(key)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { forest: self, stack }
    }

    /// Parent chain of `key`, nearest first.
    pub fn iter_ancestors(&self, key: &ContentKey) -> Ancestors<'_> {
        Ancestors {
            forest: self,
            next: self.nodes.get(key).and_then(|node| node.parent),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parent_key(&self, key: &ContentKey) -> Option<Option<ContentKey>> {
        self.nodes.get(key).map(|node| node.parent)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn children_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        self.nodes.get(key).map(|node| node.children.clone())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn descendants_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        if !self.contains(key) {
            return None;
        }
        Some(self.iter_descendants(key).collect())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn ancestors_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        if !self.contains(key) {
            return None;
        }
        Some(self.iter_ancestors(key).collect())
    }

    /// Other children of the parent (or other roots), in stored order.
    #[instrument(level = "trace", skip(self))]
    pub fn siblings_keys(&self, key: &ContentKey) -> Option<Vec<ContentKey>> {
        let node = self.nodes.get(key)?;
        let siblings: &[ContentKey] = match node.parent {
            Some(parent) => self
                .nodes
                .get(&parent)
                .map(|p| p.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        };
        Some(siblings.iter().filter(|k| *k != key).copied().collect())
    }

    /// Depth of `key`, roots being level 1.
    #[instrument(level = "trace", skip(self))]
    pub fn level(&self, key: &ContentKey) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        Some(1 + self.iter_ancestors(key).count())
    }

    pub fn is_of_type(&self, key: &ContentKey, content_type: &ContentTypeKey) -> bool {
        self.nodes
            .get(key)
            .is_some_and(|node| node.content_type.as_ref() == Some(content_type))
    }

    /// Restricts `keys` to nodes of the given content type, keeping order.
    pub fn retain_of_type(
        &self,
        mut keys: Vec<ContentKey>,
        content_type: &ContentTypeKey,
    ) -> Vec<ContentKey> {
        keys.retain(|k| self.is_of_type(k, content_type));
        keys
    }

    /// Inserts a leaf appended last under `parent`, or as the last root.
    /// The caller guarantees `key` is new and `parent` is present.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(
        &mut self,
        key: ContentKey,
        parent: Option<ContentKey>,
        content_type: Option<ContentTypeKey>,
    ) {
        self.insert_unlinked(
            key,
            NavigationNode {
                parent,
                children: Vec::new(),
                content_type,
            },
        );
        self.link(key);
    }

    /// Stores a node without registering it with its parent or the roots.
    pub(crate) fn insert_unlinked(&mut self, key: ContentKey, node: NavigationNode) {
        self.nodes.insert(key, node);
    }

    /// Appends `key` to its recorded parent's children, or to the roots.
    pub(crate) fn link(&mut self, key: ContentKey) {
        match self.nodes.get(&key).and_then(|node| node.parent) {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.push(key);
                }
            }
            None => self.roots.push(key),
        }
    }

    /// Removes `key` from its parent's children, or from the roots.
    pub(crate) fn unlink(&mut self, key: ContentKey) {
        match self.nodes.get(&key).and_then(|node| node.parent) {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|child| *child != key);
                }
            }
            None => self.roots.retain(|root| *root != key),
        }
    }

    /// Detaches `key` and appends it last under `new_parent`.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn reparent(&mut self, key: ContentKey, new_parent: Option<ContentKey>) {
        self.unlink(key);
        if let Some(node) = self.nodes.get_mut(&key) {
            node.parent = new_parent;
        }
        self.link(key);
    }

    /// Removes `key` and all its descendants, keeping their internal links.
    /// The returned root has no parent.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn take_subtree(&mut self, key: ContentKey) -> Option<Subtree> {
        if !self.contains(&key) {
            return None;
        }
        let keys: Vec<ContentKey> = std::iter::once(key)
            .chain(self.iter_descendants(&key))
            .collect();
        self.unlink(key);

        let mut nodes = Vec::with_capacity(keys.len());
        for k in keys {
            if let Some(node) = self.nodes.remove(&k) {
                nodes.push((k, node));
            }
        }
        if let Some((_, root)) = nodes.first_mut() {
            root.parent = None;
        }
        Some(Subtree { nodes })
    }

    /// Inserts a detached subtree with its root appended last under `parent`.
    #[instrument(level = "trace", skip(self, subtree))]
    pub(crate) fn graft(&mut self, subtree: Subtree, parent: Option<ContentKey>) {
        let root = subtree.nodes.first().map(|(key, _)| *key);
        for (i, (key, mut node)) in subtree.nodes.into_iter().enumerate() {
            if i == 0 {
                node.parent = parent;
            }
            self.nodes.insert(key, node);
        }
        if let Some(root) = root {
            self.link(root);
        }
    }
}

/// Pre-order iterator, children visited in stored order.
pub struct Descendants<'a> {
    forest: &'a Forest,
    stack: Vec<ContentKey>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ContentKey;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.forest.nodes.get(&current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some(current);
            }
        }
        None
    }
}

/// Walks parent links upward.
pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<ContentKey>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = ContentKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let node = self.forest.nodes.get(&current)?;
        self.next = node.parent;
        Some(current)
    }
}
