//! End-to-end audit tests against an in-memory repository
//!
//! These tests drive fetching, snapshot validation, analysis and report
//! writing through a fake [`RepositoryClient`].

use assetaudit::analysis::{NoProgress, RepositoryData, Snapshot, UsageIndex};
use assetaudit::audit;
use assetaudit::client::{ClientError, RepositoryClient};
use assetaudit::config::Config;
use assetaudit::model::{
    Asset, ContentItem, ContentType, ContentTypeSnippet, ElementDefinition, ElementValue,
    EnvironmentInformation, Language, LanguageVariant, Reference,
};
use assetaudit::report::{DuplicateAssetJsonRecord, ReportWriter};
use assetaudit::UnusedAssetRecord;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use tempfile::TempDir;

const ENVIRONMENT_ID: &str = "0f6a8bde-1c1b-4d6b-9b5a-5c3b2f0e9d11";

// ============================================================================
// Fake repository
// ============================================================================

#[derive(Default)]
struct FakeRepository {
    data: RepositoryData,
    variants_by_item: HashMap<String, Vec<LanguageVariant>>,
    requested_items: RefCell<Vec<String>>,
    fail_assets: bool,
}

impl FakeRepository {
    fn new(data: RepositoryData) -> Self {
        let mut variants_by_item: HashMap<String, Vec<LanguageVariant>> = HashMap::new();
        for variant in &data.variants {
            let codename = data
                .content_items
                .iter()
                .find(|item| item.id == variant.item.id)
                .map(|item| item.codename.clone())
                .unwrap_or_else(|| variant.item.id.clone());
            variants_by_item.entry(codename).or_default().push(variant.clone());
        }

        Self {
            data,
            variants_by_item,
            ..Default::default()
        }
    }
}

impl RepositoryClient for FakeRepository {
    fn environment_information(&self) -> Result<EnvironmentInformation, ClientError> {
        Ok(EnvironmentInformation {
            id: ENVIRONMENT_ID.to_string(),
            name: "Sample project".to_string(),
            environment: "Production".to_string(),
        })
    }

    fn list_assets(&self) -> Result<Vec<Asset>, ClientError> {
        if self.fail_assets {
            return Err(ClientError::Api {
                status: 401,
                url: "https://manage.kontent.ai/v2/projects/x/assets".to_string(),
                body: "{\"message\":\"Unauthorized\"}".to_string(),
                retry_after: None,
            });
        }
        Ok(self.data.assets.clone())
    }

    fn list_content_types(&self) -> Result<Vec<ContentType>, ClientError> {
        Ok(self.data.content_types.clone())
    }

    fn list_content_type_snippets(&self) -> Result<Vec<ContentTypeSnippet>, ClientError> {
        Ok(self.data.snippets.clone())
    }

    fn list_languages(&self) -> Result<Vec<Language>, ClientError> {
        Ok(self.data.languages.clone())
    }

    fn list_content_items(&self) -> Result<Vec<ContentItem>, ClientError> {
        Ok(self.data.content_items.clone())
    }

    fn list_language_variants(
        &self,
        item_codename: &str,
    ) -> Result<Vec<LanguageVariant>, ClientError> {
        self.requested_items
            .borrow_mut()
            .push(item_codename.to_string());
        Ok(self
            .variants_by_item
            .get(item_codename)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn asset(id: &str, file_name: &str) -> Asset {
    Asset {
        id: id.to_string(),
        codename: format!("{}_codename", id),
        title: None,
        file_name: file_name.to_string(),
        url: format!("https://assets.example.com/{}/{}", id, file_name),
    }
}

fn definition(id: &str, codename: &str) -> ElementDefinition {
    ElementDefinition {
        id: id.to_string(),
        codename: Some(codename.to_string()),
    }
}

fn item(id: &str, codename: &str, name: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        codename: codename.to_string(),
        name: name.to_string(),
        content_type: Reference::new("type-article"),
    }
}

fn variant(item_id: &str, values: Vec<(&str, Value)>) -> LanguageVariant {
    LanguageVariant {
        item: Reference::new(item_id),
        language: Reference::new("lang-en"),
        elements: values
            .into_iter()
            .map(|(element, value)| ElementValue {
                element: Reference::new(element),
                value,
            })
            .collect(),
    }
}

/// Assets a1/a2 share "cat.jpg", a3 is "dog.jpg"
fn repository(variants: Vec<LanguageVariant>) -> RepositoryData {
    RepositoryData {
        assets: vec![
            asset("a1", "cat.jpg"),
            asset("a2", "cat.jpg"),
            asset("a3", "dog.jpg"),
        ],
        languages: vec![Language {
            id: "lang-en".to_string(),
            codename: "en-US".to_string(),
            name: Some("English".to_string()),
        }],
        content_types: vec![ContentType {
            id: "type-article".to_string(),
            codename: "article".to_string(),
            name: "Article".to_string(),
            elements: vec![definition("el-title", "title"), definition("el-hero", "hero_image")],
        }],
        snippets: vec![ContentTypeSnippet {
            id: "snippet-seo".to_string(),
            codename: "seo".to_string(),
            elements: vec![definition("el-og", "seo__og_image")],
        }],
        content_items: vec![
            item("item-1", "first_article", "First article"),
            item("item-2", "second_article", "Second article"),
        ],
        variants,
    }
}

fn run(data: RepositoryData) -> miette::Result<assetaudit::AuditReport> {
    let client = FakeRepository::new(data);
    audit::run(&client, &Config::default(), ENVIRONMENT_ID, &NoProgress)
}

fn unused_ids(report: &assetaudit::AuditReport) -> Vec<&str> {
    report.unused_assets.iter().map(|r| r.id.as_str()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_nothing_referenced() {
    let report = run(repository(vec![variant(
        "item-1",
        vec![("el-title", json!("Hello")), ("el-hero", json!([]))],
    )]))
    .unwrap();

    assert_eq!(unused_ids(&report), vec!["a1", "a2", "a3"]);
    assert_eq!(report.duplicate_assets.len(), 1);

    let group = &report.duplicate_assets[0];
    assert_eq!(group.shared_filename, "cat.jpg");
    let ids: Vec<_> = group.duplicate_assets.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert!(group.duplicate_assets.iter().all(|a| a.used_in.is_empty()));
}

#[test]
fn test_referenced_asset_gains_usage_site() {
    let report = run(repository(vec![variant(
        "item-1",
        vec![("el-title", json!("Hello")), ("el-hero", json!([{ "id": "a1" }]))],
    )]))
    .unwrap();

    assert_eq!(unused_ids(&report), vec!["a2", "a3"]);

    let members = &report.duplicate_assets[0].duplicate_assets;
    assert_eq!(members[0].id, "a1");
    assert_eq!(members[0].used_in.len(), 1);

    let site = &members[0].used_in[0];
    assert_eq!(site.item_codename, "first_article");
    assert_eq!(site.item_name, "First article");
    assert_eq!(site.language_codename, "en-US");
    assert_eq!(site.type_codename, "article");
    assert_eq!(site.element, "hero_image");
}

#[test]
fn test_snippet_element_usage() {
    let report = run(repository(vec![variant(
        "item-2",
        vec![("el-og", json!([{ "id": "a2" }]))],
    )]))
    .unwrap();

    let members = &report.duplicate_assets[0].duplicate_assets;
    assert!(members[0].used_in.is_empty());
    assert_eq!(members[1].used_in[0].element, "seo__og_image");
    assert_eq!(members[1].used_in[0].item_codename, "second_article");
}

#[test]
fn test_unknown_item_aborts_without_output() {
    let output = TempDir::new().unwrap();
    let config = Config {
        output_dir: output.path().to_path_buf(),
        ..Config::default()
    };

    // The API hands back a variant whose item is not in the item listing
    let mut client = FakeRepository::new(repository(vec![variant(
        "item-1",
        vec![("el-title", json!("x"))],
    )]));
    client
        .variants_by_item
        .get_mut("first_article")
        .unwrap()
        .push(variant("item-ghost", vec![("el-title", json!("y"))]));

    let result = audit::run(&client, &config, ENVIRONMENT_ID, &NoProgress)
        .and_then(|report| ReportWriter::new(&config).write(&report));

    let err = result.unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("'item-ghost'")));

    let entries = std::fs::read_dir(output.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[test]
fn test_unknown_element_aborts() {
    let data = repository(vec![variant("item-1", vec![("el-missing", json!("x"))])]);
    let err = Snapshot::new(data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid element with id 'el-missing' in type 'Article'"
    );
}

#[test]
fn test_transport_error_propagates() {
    let mut client = FakeRepository::new(repository(vec![]));
    client.fail_assets = true;

    let result = audit::run(&client, &Config::default(), ENVIRONMENT_ID, &NoProgress);
    let err = result.unwrap_err();
    assert!(err.chain().any(|e| e.to_string().contains("(401)")));
}

#[test]
fn test_variants_fetched_per_item() {
    let client = FakeRepository::new(repository(vec![
        variant("item-1", vec![("el-title", json!("a"))]),
        variant("item-2", vec![("el-title", json!("b"))]),
    ]));

    let data = audit::fetch_repository(&client, &NoProgress).unwrap();
    assert_eq!(data.variants.len(), 2);
    assert_eq!(
        *client.requested_items.borrow(),
        vec!["first_article".to_string(), "second_article".to_string()]
    );
}

#[test]
fn test_usage_detection_is_deterministic() {
    let snapshot = Snapshot::new(repository(vec![
        variant(
            "item-2",
            vec![("el-hero", json!([{ "id": "a1" }])), ("el-og", json!([{ "id": "a1" }]))],
        ),
        variant("item-1", vec![("el-title", json!("<p data-asset-id=\"A1\"></p>"))]),
    ]))
    .unwrap();
    let usage = UsageIndex::new(&snapshot);
    let a1 = &snapshot.assets()[0];

    let first = usage.find_usage_sites(a1).unwrap();
    let second = usage.find_usage_sites(a1).unwrap();
    assert_eq!(first, second);

    let elements: Vec<_> = first.iter().map(|s| s.element.as_str()).collect();
    assert_eq!(elements, vec!["hero_image", "seo__og_image", "title"]);
}

#[test]
fn test_json_reports_round_trip() {
    let output = TempDir::new().unwrap();
    let config = Config {
        output_dir: output.path().to_path_buf(),
        ..Config::default()
    };

    let report = run(repository(vec![variant(
        "item-1",
        vec![("el-hero", json!([{ "id": "a2" }]))],
    )]))
    .unwrap();
    ReportWriter::new(&config).write(&report).unwrap();

    let unused: Vec<UnusedAssetRecord> = serde_json::from_slice(
        &std::fs::read(output.path().join("_unused-assets.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(unused, report.unused_assets);

    let duplicates: Vec<DuplicateAssetJsonRecord> = serde_json::from_slice(
        &std::fs::read(output.path().join("_duplicate-assets.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(duplicates, report.duplicate_assets);
    assert_eq!(
        duplicates[0].duplicate_assets[0].app_url,
        format!(
            "https://app.kontent.ai/{}/content-inventory/assets/asset/a1",
            ENVIRONMENT_ID
        )
    );
}
