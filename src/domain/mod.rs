//! Domain layer: navigation forests and their structural operations
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod index;
pub mod keys;
pub mod render;

pub use arena::{Forest, NavigationNode};
pub use builder::{BuiltForests, ForestBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use index::NavigationIndex;
pub use keys::{KeyGenerator, RandomKeyGenerator, SequentialKeyGenerator};
pub use render::TreeDisplay;
