//! Immutable, indexed view over everything fetched from the repository

use std::collections::HashMap;

use tracing::debug;

use super::IntegrityError;
use crate::model::{
    Asset, ContentItem, ContentType, ContentTypeSnippet, ElementDefinition, Language,
    LanguageVariant,
};

/// Raw reference data as fetched from the repository, in fetch order
#[derive(Debug, Clone, Default)]
pub struct RepositoryData {
    pub assets: Vec<Asset>,
    pub languages: Vec<Language>,
    pub content_types: Vec<ContentType>,
    pub snippets: Vec<ContentTypeSnippet>,
    pub content_items: Vec<ContentItem>,
    pub variants: Vec<LanguageVariant>,
}

/// Something that defines elements: a content type or a snippet
pub trait ElementSource {
    fn element_definitions(&self) -> &[ElementDefinition];

    fn find_element(&self, element_id: &str) -> Option<&ElementDefinition> {
        self.element_definitions()
            .iter()
            .find(|element| element.id == element_id)
    }
}

impl ElementSource for ContentType {
    fn element_definitions(&self) -> &[ElementDefinition] {
        &self.elements
    }
}

impl ElementSource for ContentTypeSnippet {
    fn element_definitions(&self) -> &[ElementDefinition] {
        &self.elements
    }
}

/// The item, language and content type a variant belongs to
#[derive(Debug, Clone, Copy)]
pub struct ResolvedVariant<'a> {
    pub item: &'a ContentItem,
    pub language: &'a Language,
    pub content_type: &'a ContentType,
}

/// Validated snapshot of the repository
///
/// Construction checks every variant reference (item, language, content type
/// and element), so all later lookups against the same data succeed.
#[derive(Debug)]
pub struct Snapshot {
    data: RepositoryData,
    language_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
    type_index: HashMap<String, usize>,
}

impl Snapshot {
    /// Index and validate fetched data
    pub fn new(data: RepositoryData) -> Result<Self, IntegrityError> {
        let language_index = index_by_id(data.languages.iter().map(|l| l.id.as_str()));
        let item_index = index_by_id(data.content_items.iter().map(|i| i.id.as_str()));
        let type_index = index_by_id(data.content_types.iter().map(|t| t.id.as_str()));

        let snapshot = Self {
            data,
            language_index,
            item_index,
            type_index,
        };
        snapshot.validate()?;

        debug!(
            "Snapshot: {} assets, {} variants, {} items, {} types, {} snippets, {} languages",
            snapshot.data.assets.len(),
            snapshot.data.variants.len(),
            snapshot.data.content_items.len(),
            snapshot.data.content_types.len(),
            snapshot.data.snippets.len(),
            snapshot.data.languages.len()
        );

        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), IntegrityError> {
        for variant in &self.data.variants {
            let resolved = self.resolve_variant(variant)?;
            for element in &variant.elements {
                self.resolve_element(resolved.content_type, &element.element.id)?;
            }
        }
        Ok(())
    }

    pub fn assets(&self) -> &[Asset] {
        &self.data.assets
    }

    pub fn variants(&self) -> &[LanguageVariant] {
        &self.data.variants
    }

    /// Resolve the language, item and content type of a variant
    pub fn resolve_variant<'a>(
        &'a self,
        variant: &LanguageVariant,
    ) -> Result<ResolvedVariant<'a>, IntegrityError> {
        let language = self
            .language_index
            .get(&variant.language.id)
            .map(|&i| &self.data.languages[i])
            .ok_or_else(|| IntegrityError::UnknownLanguage {
                language_id: variant.language.id.clone(),
                item_id: variant.item.id.clone(),
            })?;

        let item = self
            .item_index
            .get(&variant.item.id)
            .map(|&i| &self.data.content_items[i])
            .ok_or_else(|| IntegrityError::UnknownItem {
                item_id: variant.item.id.clone(),
                language_id: variant.language.id.clone(),
            })?;

        let content_type = self
            .type_index
            .get(&item.content_type.id)
            .map(|&i| &self.data.content_types[i])
            .ok_or_else(|| IntegrityError::UnknownType {
                type_id: item.content_type.id.clone(),
                item_id: item.id.clone(),
            })?;

        Ok(ResolvedVariant {
            item,
            language,
            content_type,
        })
    }

    /// Find an element definition on the content type, falling back to snippets
    pub fn resolve_element<'a>(
        &'a self,
        content_type: &'a ContentType,
        element_id: &str,
    ) -> Result<&'a ElementDefinition, IntegrityError> {
        std::iter::once(content_type as &dyn ElementSource)
            .chain(self.data.snippets.iter().map(|s| s as &dyn ElementSource))
            .find_map(|source| source.find_element(element_id))
            .ok_or_else(|| IntegrityError::UnknownElement {
                element_id: element_id.to_string(),
                type_name: content_type.name.clone(),
            })
    }
}

fn index_by_id<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        // First occurrence wins, matching a linear search
        index.entry(id.to_string()).or_insert(position);
    }
    index
}
