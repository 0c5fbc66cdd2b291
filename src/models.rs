//! Domain models shared by the store, the persistence layer and the TUI.
//! These types stay plain data holders; behavior lives in `store`, `render`
//! and `shelf`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single tracked book. The serialized field names (`isComplete` in
/// particular) match the JSON layout kept under the persisted key.
pub struct Book {
    /// Millisecond timestamp taken when the book was created. Unique for the
    /// lifetime of the collection.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year. Stored as an integer so sorting and display never
    /// depend on how the user typed it. A stored `null` (an unparseable
    /// year) reads back as `0`.
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: i64,
    /// `true` once the book sits in the completed group.
    pub is_complete: bool,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

fn lenient_year<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field values collected by the add form before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub is_complete: bool,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            is_complete: false,
        }
    }

    /// Builder-style toggle for the completion checkbox.
    pub fn completed(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }
}
