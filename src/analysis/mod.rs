//! Asset usage analysis
//!
//! The analysis runs over a fully materialized [`Snapshot`]:
//! 1. **Usage detection** - where is an asset referenced ([`UsageIndex`])
//! 2. **Unused detection** - assets referenced nowhere ([`find_unused`])
//! 3. **Duplicate grouping** - assets sharing a filename ([`find_duplicates`])

mod duplicates;
mod progress;
mod snapshot;
mod unused;
mod usage;

pub use duplicates::{find_duplicates, DuplicateAssetGroup, DuplicateAssetUsage};
pub use progress::{BarProgress, NoProgress, Progress, Stage};
pub use snapshot::{ElementSource, RepositoryData, ResolvedVariant, Snapshot};
pub use unused::{find_unused, AppUrlBuilder, UnusedAssetRecord};
pub use usage::{AssetUsageSite, MatchMode, UsageIndex};

use thiserror::Error;

/// The fetched data references an entity that does not exist
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Invalid language with id '{language_id}' (variant of item '{item_id}')")]
    UnknownLanguage { language_id: String, item_id: String },

    #[error("Invalid content item with id '{item_id}' (variant in language '{language_id}')")]
    UnknownItem { item_id: String, language_id: String },

    #[error("Invalid type with id '{type_id}' (content item '{item_id}')")]
    UnknownType { type_id: String, item_id: String },

    #[error("Invalid element with id '{element_id}' in type '{type_name}'")]
    UnknownElement { element_id: String, type_name: String },
}
