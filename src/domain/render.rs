use termtree::Tree;

use crate::domain::arena::Forest;
use crate::domain::entities::ContentKey;

pub trait TreeDisplay {
    fn to_tree(&self, label: &str) -> Tree<String>;
}

impl TreeDisplay for Forest {
    fn to_tree(&self, label: &str) -> Tree<String> {
        fn build_tree(forest: &Forest, key: &ContentKey) -> Tree<String> {
            let leaves: Vec<_> = forest
                .get_node(key)
                .map(|node| {
                    node.children
                        .iter()
                        .map(|child| build_tree(forest, child))
                        .collect()
                })
                .unwrap_or_default();
            Tree::new(key.to_string()).with_leaves(leaves)
        }

        let leaves: Vec<_> = self.roots().iter().map(|root| build_tree(self, root)).collect();
        Tree::new(label.to_string()).with_leaves(leaves)
    }
}
