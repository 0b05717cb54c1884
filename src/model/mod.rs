//! Repository entities as returned by the Management API
//!
//! Everything in here is a read-only snapshot of repository data. Only the
//! fields the audit needs are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Reference to another entity by id (`{"id": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A binary file stored in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique, stable identifier
    pub id: String,

    #[serde(default)]
    pub codename: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Name of the uploaded file; shared names flag duplicate uploads
    pub file_name: String,

    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub codename: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Definition of a single element inside a content type or snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub id: String,
    /// Guidelines elements may come without a codename
    #[serde(default)]
    pub codename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    pub codename: String,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}

/// Reusable fragment of element definitions shared between content types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeSnippet {
    pub id: String,
    #[serde(default)]
    pub codename: String,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub codename: String,
    pub name: String,
    /// The content type this item is based on
    #[serde(rename = "type")]
    pub content_type: Reference,
}

/// Value stored for one element of a language variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementValue {
    pub element: Reference,
    /// Opaque value: string, number, rich text, list of references, ...
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ElementValue {
    /// Null and empty-string values can never hold a reference
    pub fn is_empty(&self) -> bool {
        match &self.value {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Language-specific element values of one content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageVariant {
    pub item: Reference,
    pub language: Reference,
    #[serde(default)]
    pub elements: Vec<ElementValue>,
}

/// Project and environment the API key belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInformation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environment: String,
}
