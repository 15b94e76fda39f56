//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable, externally assigned identifier of a content item.
pub type ContentKey = Uuid;

/// Identifier of the content type a node was created from.
pub type ContentTypeKey = Uuid;

/// Row id the repository uses for "no parent".
pub const ROOT_PARENT_ID: i64 = -1;

/// Kind of content a navigation structure is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentObjectType {
    Document,
    Media,
}

impl ContentObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for ContentObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a content object type name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content object type: {value}")]
pub struct ObjectTypeParseError {
    /// The name as given
    pub value: String,
}

impl FromStr for ContentObjectType {
    type Err = ObjectTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "media" => Ok(Self::Media),
            _ => Err(ObjectTypeParseError {
                value: s.to_string(),
            }),
        }
    }
}

/// One flat row as supplied by the repository for a rebuild.
///
/// `id` and `parent_id` are the repository's internal sequential row ids;
/// only `key` is exposed by the index. Row order defines sibling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRow {
    /// Stable content identifier
    pub key: ContentKey,
    /// Internal row id
    pub id: i64,
    /// Row id of the parent, or the root sentinel
    pub parent_id: i64,
    /// Whether the item sits in the recycle bin
    pub trashed: bool,
    /// Content type of the item, if known
    #[serde(default)]
    pub content_type: Option<ContentTypeKey>,
}

impl NavigationRow {
    pub fn new(key: ContentKey, id: i64, parent_id: i64) -> Self {
        Self {
            key,
            id,
            parent_id,
            trashed: false,
            content_type: None,
        }
    }

    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    pub fn of_type(mut self, content_type: ContentTypeKey) -> Self {
        self.content_type = Some(content_type);
        self
    }
}
