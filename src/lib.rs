//! navindex: in-memory navigation index for hierarchical content
//!
//! Mirrors the parent/child structure of documents or media as two forests,
//! the live tree and the recycle bin, and answers structural queries
//! (parent, children, descendants, ancestors, siblings, level) without
//! touching the durable store.
//!
//! Layers:
//! - [`domain`]: forests, the index and its mutations, row-based rebuild
//! - [`application`]: per-object-type navigation services
//! - [`infrastructure`]: repository boundary and service wiring
//! - [`config`]: layered settings

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::services::NavigationService;
pub use config::Settings;
pub use domain::{
    ContentKey, ContentObjectType, ContentTypeKey, DomainError, DomainResult, NavigationIndex,
    NavigationRow,
};
pub use infrastructure::di::ServiceContainer;
