//! assetaudit - Find unused and duplicate assets in a Kontent.ai environment
//!
//! This library provides a read-only audit of a content repository's assets.
//!
//! # Architecture
//!
//! The audit pipeline consists of:
//! 1. **Configuration** - Credentials from the environment, options from a config file
//! 2. **Fetching** - Load assets, types, snippets, languages, items and variants
//! 3. **Snapshot** - Index the data and check referential integrity
//! 4. **Usage Detection** - Find where each asset is referenced
//! 5. **Unused & Duplicate Detection** - Classify assets
//! 6. **Reporting** - Write CSV and JSON reports

pub mod analysis;
pub mod audit;
pub mod client;
pub mod config;
pub mod model;
pub mod report;

pub use analysis::{
    find_duplicates, find_unused, AssetUsageSite, DuplicateAssetGroup, IntegrityError, MatchMode,
    Snapshot, UnusedAssetRecord, UsageIndex,
};
pub use client::{ClientError, ManagementClient, RepositoryClient};
pub use config::{Config, Credentials};
pub use model::Asset;
pub use report::{AuditReport, ReportWriter, TerminalReporter};
