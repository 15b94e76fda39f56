//! Forest builder for rebuilding the navigation structure from flat rows.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::{Forest, NavigationNode};
use crate::domain::entities::{NavigationRow, ROOT_PARENT_ID};
use crate::domain::error::{DomainError, DomainResult};

/// Where a single row hangs before forests are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    LiveRoot,
    BinRoot,
    /// Under the row at this position
    Child(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Live,
    Bin,
}

/// Live and recycle-bin forests produced by a rebuild.
#[derive(Debug, Default)]
pub struct BuiltForests {
    pub live: Forest,
    pub bin: Forest,
}

/// Constructs the live and bin forests from repository rows.
#[derive(Debug, Clone)]
pub struct ForestBuilder {
    root_parent_id: i64,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new(ROOT_PARENT_ID)
    }
}

impl ForestBuilder {
    pub fn new(root_parent_id: i64) -> Self {
        Self { root_parent_id }
    }

    /// Build both forests from `rows`, preserving row order as sibling order.
    ///
    /// Trashed rows stay under trashed parents and otherwise become bin roots.
    /// Live rows whose parent is missing or trashed are orphans and become bin
    /// roots, taking their live descendants with them.
    #[instrument(level = "debug", skip(self, rows), fields(rows = rows.len()))]
    pub fn build(&self, rows: &[NavigationRow]) -> DomainResult<BuiltForests> {
        let position_by_id = Self::index_rows(rows)?;
        let placements: Vec<Placement> = rows
            .iter()
            .map(|row| self.place(row, rows, &position_by_id))
            .collect();
        let sides = Self::resolve_sides(rows, &placements)?;

        let mut built = BuiltForests::default();

        // Store every node first so parents may follow their children in the input
        for (i, row) in rows.iter().enumerate() {
            let parent = match placements[i] {
                Placement::Child(p) => Some(rows[p].key),
                Placement::LiveRoot | Placement::BinRoot => None,
            };
            let node = NavigationNode {
                parent,
                children: Vec::new(),
                content_type: row.content_type,
            };
            built.forest_mut(sides[i]).insert_unlinked(row.key, node);
        }
        for (i, row) in rows.iter().enumerate() {
            built.forest_mut(sides[i]).link(row.key);
        }

        debug!(
            "build: live={} bin={}",
            built.live.len(),
            built.bin.len()
        );
        Ok(built)
    }

    fn index_rows(rows: &[NavigationRow]) -> DomainResult<HashMap<i64, usize>> {
        let mut position_by_id = HashMap::with_capacity(rows.len());
        let mut keys = HashSet::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if !keys.insert(row.key) {
                return Err(DomainError::DuplicateRow(row.key));
            }
            if position_by_id.insert(row.id, i).is_some() {
                return Err(DomainError::DuplicateRowId(row.id));
            }
        }
        Ok(position_by_id)
    }

    fn place(
        &self,
        row: &NavigationRow,
        rows: &[NavigationRow],
        position_by_id: &HashMap<i64, usize>,
    ) -> Placement {
        if row.parent_id == self.root_parent_id {
            return if row.trashed {
                Placement::BinRoot
            } else {
                Placement::LiveRoot
            };
        }
        match position_by_id.get(&row.parent_id) {
            Some(&p) if rows[p].trashed == row.trashed => Placement::Child(p),
            _ => Placement::BinRoot,
        }
    }

    /// Assign each row the forest its root chain ends in.
    fn resolve_sides(rows: &[NavigationRow], placements: &[Placement]) -> DomainResult<Vec<Side>> {
        let mut sides: Vec<Option<Side>> = vec![None; rows.len()];

        for start in 0..rows.len() {
            let mut path = Vec::new();
            let mut on_path = HashSet::new();
            let mut current = start;

            let side = loop {
                if let Some(side) = sides[current] {
                    break side;
                }
                if !on_path.insert(current) {
                    return Err(DomainError::RowCycle(rows[current].key));
                }
                path.push(current);
                match placements[current] {
                    Placement::LiveRoot => break Side::Live,
                    Placement::BinRoot => break Side::Bin,
                    Placement::Child(parent) => current = parent,
                }
            };

            for i in path {
                sides[i] = Some(side);
            }
        }

        Ok(sides.into_iter().map(|s| s.unwrap_or(Side::Bin)).collect())
    }
}

impl BuiltForests {
    fn forest_mut(&mut self, side: Side) -> &mut Forest {
        match side {
            Side::Live => &mut self.live,
            Side::Bin => &mut self.bin,
        }
    }
}
