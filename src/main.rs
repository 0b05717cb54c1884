use assetaudit::analysis::{BarProgress, MatchMode, NoProgress, Progress};
use assetaudit::audit;
use assetaudit::client::{ManagementClient, RepositoryClient};
use assetaudit::config::{load_env_file, Config, Credentials};
use assetaudit::report::{ReportWriter, TerminalReporter};
use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// assetaudit - Find unused and duplicate assets in a Kontent.ai environment
///
/// Requires ENVIRONMENT_ID and API_KEY (Management API key) in the
/// environment or in a .env file.
#[derive(Parser, Debug)]
#[command(name = "assetaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Env file to load credentials from (default: .env if present)
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Directory to write the reports to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// How element values are searched for asset ids
    #[arg(short, long, value_enum)]
    match_mode: Option<MatchModeArg>,

    /// Number of duplicate groups listed in the terminal summary
    #[arg(long, default_value_t = 20)]
    show_groups: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum MatchModeArg {
    /// Case-insensitive search in the serialized value (may over-report)
    Substring,
    /// Only standalone ids inside string values
    Exact,
}

impl From<MatchModeArg> for MatchMode {
    fn from(mode: MatchModeArg) -> Self {
        match mode {
            MatchModeArg::Substring => MatchMode::Substring,
            MatchModeArg::Exact => MatchMode::Exact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("assetaudit v{}", env!("CARGO_PKG_VERSION"));

    // Credentials first: fail before any network access
    load_env_file(cli.env_file.as_deref()).into_diagnostic()?;
    let credentials = Credentials::from_env().into_diagnostic()?;

    let config = load_config(&cli)?;

    run_audit(&config, &credentials, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(Path::new("."))?
    };

    // Override with CLI arguments
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(mode) = cli.match_mode {
        config.match_mode = mode.into();
    }

    Ok(config)
}

fn run_audit(config: &Config, credentials: &Credentials, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();

    let client = ManagementClient::new(
        &config.api_base_url,
        &credentials.environment_id,
        &credentials.api_key,
        config.client.timeout(),
    )
    .into_diagnostic()
    .wrap_err("Failed to create Management API client")?
    .with_retry(config.client.retry());

    let environment = client
        .environment_information()
        .into_diagnostic()
        .wrap_err("Failed to fetch environment information")?;

    if !cli.quiet {
        println!(
            "{}",
            format!(
                "Using project '{}' and environment '{}'",
                environment.name.yellow(),
                environment.environment.yellow()
            )
            .green()
        );
    }

    let bar = BarProgress::new();
    let progress: &dyn Progress = if cli.quiet { &NoProgress } else { &bar };

    let report = audit::run(&client, config, &credentials.environment_id, progress)?;

    let written = ReportWriter::new(config).write(&report)?;

    if !cli.quiet {
        TerminalReporter::new()
            .with_max_groups(cli.show_groups)
            .report(&report, &written);
        println!(
            "{}",
            format!(
                "Audit completed in {:.2}s ({})",
                start_time.elapsed().as_secs_f64(),
                report_asset_count(&report)
            )
            .dimmed()
        );
    }

    Ok(())
}

fn report_asset_count(report: &assetaudit::AuditReport) -> String {
    format!(
        "{} unused, {} duplicated",
        report.unused_assets.len(),
        report
            .duplicate_assets
            .iter()
            .map(|group| group.duplicate_assets.len())
            .sum::<usize>()
    )
}
