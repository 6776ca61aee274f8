use serde::{Deserialize, Deserializer, Serialize};

// `null` decodes like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single book record
///
/// Every field defaults to an empty string when missing or `null` in a
/// request body.
///
/// The id is always assigned by the server, so a client-supplied one is
/// overwritten before the record reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub isbn: String,
}

impl Book {
    /// Create a book with the given fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    /// Return this book re-keyed to `id`
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self
        }
    }
}
