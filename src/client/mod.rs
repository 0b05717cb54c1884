//! Read-only access to the content repository
//!
//! [`RepositoryClient`] is the narrow interface the audit needs; the
//! [`ManagementClient`] implements it on top of the Management API v2.

mod management;
mod retry;

pub use management::{decode_page, ManagementClient, DEFAULT_API_BASE_URL};
pub use retry::RetryConfig;

use std::time::Duration;

use thiserror::Error;

use crate::model::{
    Asset, ContentItem, ContentType, ContentTypeSnippet, EnvironmentInformation, Language,
    LanguageVariant,
};

/// Errors raised while talking to the repository
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Management API error ({status}) for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
        /// Delay requested by the server through `Retry-After`
        retry_after: Option<Duration>,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Whether repeating the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Request(e) => e.is_timeout() || e.is_connect(),
            ClientError::Api { status, .. } => *status == 429 || *status >= 500,
            ClientError::Decode { .. } => false,
        }
    }
}

/// Bulk, order-stable reads of repository entities
///
/// Listing operations return complete collections; pagination is handled by
/// the implementation.
pub trait RepositoryClient {
    fn environment_information(&self) -> Result<EnvironmentInformation, ClientError>;

    fn list_assets(&self) -> Result<Vec<Asset>, ClientError>;

    fn list_content_types(&self) -> Result<Vec<ContentType>, ClientError>;

    fn list_content_type_snippets(&self) -> Result<Vec<ContentTypeSnippet>, ClientError>;

    fn list_languages(&self) -> Result<Vec<Language>, ClientError>;

    fn list_content_items(&self) -> Result<Vec<ContentItem>, ClientError>;

    /// All language variants of one content item
    fn list_language_variants(&self, item_codename: &str)
        -> Result<Vec<LanguageVariant>, ClientError>;
}
