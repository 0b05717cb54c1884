//! End-to-end audit: fetch, analyze, build the report

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, info};

use crate::analysis::{
    find_duplicates, find_unused, AppUrlBuilder, IntegrityError, Progress, RepositoryData,
    Snapshot, Stage, UsageIndex,
};
use crate::client::{ClientError, RepositoryClient};
use crate::config::Config;
use crate::report::AuditReport;

/// Fetch every entity the audit needs, to completion
pub fn fetch_repository(
    client: &dyn RepositoryClient,
    progress: &dyn Progress,
) -> Result<RepositoryData, ClientError> {
    info!("Fetching all content types");
    let content_types = client.list_content_types()?;

    info!("Fetching all content type snippets");
    let snippets = client.list_content_type_snippets()?;

    info!("Fetching all languages");
    let languages = client.list_languages()?;

    info!("Fetching all assets");
    let assets = client.list_assets()?;
    info!("All {} assets fetched", assets.len());

    info!("Fetching all content items");
    let content_items = client.list_content_items()?;
    info!("All {} content items fetched", content_items.len());

    progress.start(Stage::FetchingVariants, content_items.len());
    let mut variants = Vec::new();
    for item in &content_items {
        let item_variants = client.list_language_variants(&item.codename)?;
        progress.advance(&item.codename);
        variants.extend(item_variants);
    }
    progress.finish();
    info!("All {} language variants fetched", variants.len());

    Ok(RepositoryData {
        assets,
        languages,
        content_types,
        snippets,
        content_items,
        variants,
    })
}

/// Find unused and duplicate assets in a validated snapshot
pub fn analyze(
    snapshot: &Snapshot,
    config: &Config,
    environment_id: &str,
    progress: &dyn Progress,
) -> Result<AuditReport, IntegrityError> {
    let usage = UsageIndex::new(snapshot).with_mode(config.match_mode);
    let app_urls = AppUrlBuilder::new(config.app_host.as_str(), environment_id);
    debug!("Matching asset ids in {} mode", usage.mode());

    let unused = find_unused(snapshot.assets(), &usage, &app_urls, progress);
    info!("Found '{}' unused assets", unused.len());

    let groups = find_duplicates(snapshot.assets(), &usage, progress)?;
    info!("Found '{}' instances of duplicate assets", groups.len());

    Ok(AuditReport::new(unused, &groups, &app_urls))
}

/// Fetch the repository and analyze it
pub fn run(
    client: &dyn RepositoryClient,
    config: &Config,
    environment_id: &str,
    progress: &dyn Progress,
) -> Result<AuditReport> {
    let data = fetch_repository(client, progress)
        .into_diagnostic()
        .wrap_err("Failed to fetch repository data")?;

    let snapshot = Snapshot::new(data)
        .into_diagnostic()
        .wrap_err("Repository data is inconsistent")?;

    analyze(&snapshot, config, environment_id, progress)
        .into_diagnostic()
        .wrap_err("Asset analysis failed")
}
