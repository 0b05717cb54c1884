//! Asset usage detection
//!
//! Element values have heterogeneous shapes (asset lists, rich text with inline
//! asset links, components, ...), so detection works on the value as a whole
//! rather than on a typed model of each element kind. Two strategies exist:
//!
//! - [`MatchMode::Substring`]: case-insensitive search for the asset id in the
//!   compact JSON text of the value. Shape agnostic, but an id embedded in an
//!   unrelated string (a URL, a longer token) also counts as a reference.
//! - [`MatchMode::Exact`]: walk the value and only accept string leaves that
//!   equal the id or contain it as a standalone token.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IntegrityError, Snapshot};
use crate::model::{Asset, ElementValue};

/// How element values are searched for asset ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Substring,
    Exact,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::Exact => "exact",
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One place an asset is referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUsageSite {
    pub item_name: String,
    pub item_codename: String,
    pub language_codename: String,
    pub type_codename: String,
    /// Codename of the element holding the reference
    pub element: String,
}

/// Answers usage questions for single assets against a snapshot
///
/// Every query scans all variants, so answers are produced per asset and
/// always reflect the whole snapshot. In substring mode the lowercased JSON
/// text of each element value is built once, up front.
#[derive(Debug, Clone)]
pub struct UsageIndex<'a> {
    snapshot: &'a Snapshot,
    mode: MatchMode,
    /// Lowercased compact JSON per variant and element; empty in exact mode
    texts: Vec<Vec<String>>,
}

impl<'a> UsageIndex<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self::build(snapshot, MatchMode::default())
    }

    pub fn with_mode(self, mode: MatchMode) -> Self {
        if mode == self.mode {
            return self;
        }
        Self::build(self.snapshot, mode)
    }

    fn build(snapshot: &'a Snapshot, mode: MatchMode) -> Self {
        let texts = match mode {
            MatchMode::Substring => snapshot
                .variants()
                .iter()
                .map(|variant| {
                    variant
                        .elements
                        .iter()
                        .map(|element| element.value.to_string().to_lowercase())
                        .collect()
                })
                .collect(),
            MatchMode::Exact => Vec::new(),
        };

        Self {
            snapshot,
            mode,
            texts,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether any element of any variant references the asset
    pub fn is_used(&self, asset: &Asset) -> bool {
        let needle = asset.id.to_lowercase();
        self.snapshot
            .variants()
            .iter()
            .enumerate()
            .any(|(v, variant)| {
                variant
                    .elements
                    .iter()
                    .enumerate()
                    .any(|(e, element)| self.element_references(&needle, v, e, element))
            })
    }

    /// Every place the asset is referenced, in variant then element order
    pub fn find_usage_sites(&self, asset: &Asset) -> Result<Vec<AssetUsageSite>, IntegrityError> {
        let needle = asset.id.to_lowercase();
        let mut sites = Vec::new();

        for (v, variant) in self.snapshot.variants().iter().enumerate() {
            for (e, element) in variant.elements.iter().enumerate() {
                if !self.element_references(&needle, v, e, element) {
                    continue;
                }

                let resolved = self.snapshot.resolve_variant(variant)?;
                let definition = self
                    .snapshot
                    .resolve_element(resolved.content_type, &element.element.id)?;

                sites.push(AssetUsageSite {
                    item_name: resolved.item.name.clone(),
                    item_codename: resolved.item.codename.clone(),
                    language_codename: resolved.language.codename.clone(),
                    type_codename: resolved.content_type.codename.clone(),
                    element: definition.codename.clone().unwrap_or_default(),
                });
            }
        }

        Ok(sites)
    }

    /// Whether element `element_index` of variant `variant_index` holds `needle`
    fn element_references(
        &self,
        needle: &str,
        variant_index: usize,
        element_index: usize,
        element: &ElementValue,
    ) -> bool {
        if needle.is_empty() || element.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::Substring => self
                .texts
                .get(variant_index)
                .and_then(|texts| texts.get(element_index))
                .is_some_and(|text| text.contains(needle)),
            MatchMode::Exact => contains_token(needle, &element.value),
        }
    }
}

/// Walk a JSON value looking for a string leaf holding `needle` as a token
fn contains_token(needle: &str, value: &Value) -> bool {
    match value {
        Value::String(s) => string_contains_token(needle, &s.to_lowercase()),
        Value::Array(values) => values.iter().any(|v| contains_token(needle, v)),
        Value::Object(map) => map.values().any(|v| contains_token(needle, v)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

fn string_contains_token(needle: &str, haystack: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(is_id_char) && !after.is_some_and(is_id_char)
    })
}

/// Characters that may appear inside an id, so they cannot delimit one
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
