//! Blocking HTTP client for the Kontent.ai Management API v2

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ClientError, RepositoryClient, RetryConfig};
use crate::model::{
    Asset, ContentItem, ContentType, ContentTypeSnippet, EnvironmentInformation, Language,
    LanguageVariant,
};

pub const DEFAULT_API_BASE_URL: &str = "https://manage.kontent.ai/v2";

/// Header carrying the continuation token of the next listing page
const CONTINUATION_HEADER: &str = "x-continuation";

/// Management API client bound to one environment
pub struct ManagementClient {
    http: Client,
    environment_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl ManagementClient {
    /// Create a client for `environment_id`.
    ///
    /// * `api_base_url` - e.g. [`DEFAULT_API_BASE_URL`]
    pub fn new(
        api_base_url: &str,
        environment_id: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            environment_url: format!(
                "{}/projects/{}",
                api_base_url.trim_end_matches('/'),
                environment_id
            ),
            api_key: api_key.to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.environment_url, path)
    }

    /// Fetch every page of a listing endpoint
    fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        collection: &str,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.url(path);
        collect_pages(&url, collection, |continuation| {
            self.get_json(&url, continuation)
        })
    }

    /// GET a JSON document, retrying transient failures
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        continuation: Option<&str>,
    ) -> Result<T, ClientError> {
        let text = with_retries(&self.retry, url, std::thread::sleep, || {
            self.get_text(url, continuation)
        })?;

        serde_json::from_str(&text).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get_text(&self, url: &str, continuation: Option<&str>) -> Result<String, ClientError> {
        let mut request = self.http.get(url).bearer_auth(&self.api_key);
        if let Some(token) = continuation {
            request = request.header(CONTINUATION_HEADER, token);
        }

        let response = Self::ensure_success(request.send()?)?;
        Ok(response.text()?)
    }

    /// Return the response unchanged on success, or an [`ClientError::Api`]
    /// with the status and body text on failure
    fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response
            .text()
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            url,
            body,
            retry_after,
        })
    }
}

impl RepositoryClient for ManagementClient {
    fn environment_information(&self) -> Result<EnvironmentInformation, ClientError> {
        self.get_json(&self.environment_url, None)
    }

    fn list_assets(&self) -> Result<Vec<Asset>, ClientError> {
        self.list_all("/assets", "assets")
    }

    fn list_content_types(&self) -> Result<Vec<ContentType>, ClientError> {
        self.list_all("/types", "types")
    }

    fn list_content_type_snippets(&self) -> Result<Vec<ContentTypeSnippet>, ClientError> {
        self.list_all("/snippets", "snippets")
    }

    fn list_languages(&self) -> Result<Vec<Language>, ClientError> {
        self.list_all("/languages", "languages")
    }

    fn list_content_items(&self) -> Result<Vec<ContentItem>, ClientError> {
        self.list_all("/items", "items")
    }

    fn list_language_variants(
        &self,
        item_codename: &str,
    ) -> Result<Vec<LanguageVariant>, ClientError> {
        let url = self.url(&format!("/items/codename/{}/variants", item_codename));
        self.get_json(&url, None)
    }
}

/// Request pages through `fetch` until the continuation token runs out
fn collect_pages<T: DeserializeOwned>(
    url: &str,
    collection: &str,
    mut fetch: impl FnMut(Option<&str>) -> Result<Value, ClientError>,
) -> Result<Vec<T>, ClientError> {
    let mut items = Vec::new();
    let mut continuation: Option<String> = None;
    let mut page = 0;

    loop {
        page += 1;
        let body = fetch(continuation.as_deref())?;
        let (batch, next) =
            decode_page::<T>(body, collection).map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })?;

        debug!("Fetched {} {} (page {})", batch.len(), collection, page);
        items.extend(batch);

        match next {
            Some(token) => continuation = Some(token),
            None => return Ok(items),
        }
    }
}

/// Run `request`, retrying transient failures up to `retry.max_retries` times
///
/// A `Retry-After` delay sent by the server replaces the backoff delay but is
/// still capped at `retry.max_delay`.
fn with_retries<T>(
    retry: &RetryConfig,
    url: &str,
    mut sleep: impl FnMut(Duration),
    mut request: impl FnMut() -> Result<T, ClientError>,
) -> Result<T, ClientError> {
    let mut attempt = 0;

    loop {
        match request() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < retry.max_retries => {
                let delay = match &e {
                    ClientError::Api {
                        retry_after: Some(delay),
                        ..
                    } => (*delay).min(retry.max_delay),
                    _ => retry.delay_for(attempt),
                };
                warn!(
                    "Request to {} failed ({}), retrying in {:?} (attempt {}/{})",
                    url,
                    e,
                    delay,
                    attempt + 1,
                    retry.max_retries
                );
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Split one listing page into its items and the next continuation token
///
/// Pages look like `{"<collection>": [...], "pagination": {"continuation_token": ...}}`.
pub fn decode_page<T: DeserializeOwned>(
    mut body: Value,
    collection: &str,
) -> Result<(Vec<T>, Option<String>), serde_json::Error> {
    let items = body.get_mut(collection).map(Value::take).unwrap_or(Value::Null);
    let items: Vec<T> = serde_json::from_value(items)?;

    let next = body
        .pointer("/pagination/continuation_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    Ok((items, next))
}
