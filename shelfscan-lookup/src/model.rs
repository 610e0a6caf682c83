//! Catalog record and normalised lookup result

use serde::{Deserialize, Serialize};

/// Author reference as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub key: String,
}

/// Description field; the catalog sends either a bare string or a typed
/// text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed {
        #[serde(default)]
        value: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}

impl Description {
    pub fn into_text(self) -> String {
        match self {
            Description::Text(text) => text,
            Description::Typed { value, .. } => value,
        }
    }
}

/// The subset of an edition record shown to the user. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<AuthorRef>>,
    #[serde(default)]
    pub description: Option<Description>,
}

impl BookRecord {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Outcome of one lookup, always renderable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub found: bool,
    /// The code that was looked up
    pub isbn: String,
    pub title: Option<String>,
    /// Author keys, in catalog order
    pub authors: Vec<String>,
    pub description: Option<String>,
}

impl LookupResult {
    pub fn not_found(isbn: impl Into<String>) -> Self {
        Self {
            found: false,
            isbn: isbn.into(),
            title: None,
            authors: Vec::new(),
            description: None,
        }
    }

    pub fn from_record(isbn: impl Into<String>, record: BookRecord) -> Self {
        Self {
            found: true,
            isbn: isbn.into(),
            title: record.title.filter(|t| !t.trim().is_empty()),
            authors: record
                .authors
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.key)
                .filter(|key| !key.trim().is_empty())
                .collect(),
            description: record
                .description
                .map(Description::into_text)
                .filter(|d| !d.trim().is_empty()),
        }
    }
}
