use super::AuditReport;
use colored::Colorize;
use std::path::PathBuf;

/// Terminal summary with colored output
pub struct TerminalReporter {
    /// Maximum number of duplicate groups listed in detail
    max_groups: usize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { max_groups: 20 }
    }

    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    pub fn report(&self, report: &AuditReport, written: &[PathBuf]) {
        println!();

        if report.unused_assets.is_empty() {
            println!("{}", "No unused assets found!".green().bold());
        } else {
            println!(
                "{}",
                format!("Found '{}' unused assets", report.unused_assets.len())
                    .yellow()
                    .bold()
            );
        }

        if report.duplicate_assets.is_empty() {
            println!("{}", "No duplicate assets found!".green().bold());
        } else {
            println!(
                "{}",
                format!(
                    "Found '{}' instances of duplicate assets",
                    report.duplicate_assets.len()
                )
                .yellow()
                .bold()
            );
            println!();
            self.print_groups(report);
        }

        if !written.is_empty() {
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", "Reports:".bold());
            for path in written {
                println!("  {}", path.display().to_string().yellow());
            }
        }
    }

    fn print_groups(&self, report: &AuditReport) {
        for group in report.duplicate_assets.iter().take(self.max_groups) {
            println!(
                "{} {}",
                group.shared_filename.cyan().bold(),
                format!("({} copies)", group.duplicate_assets.len()).dimmed()
            );

            for asset in &group.duplicate_assets {
                let usage = if asset.used_in.is_empty() {
                    "unused".red().to_string()
                } else {
                    let items: Vec<&str> = asset
                        .used_in
                        .iter()
                        .map(|site| site.item_codename.as_str())
                        .collect();
                    format!("used in {}", items.join(", ")).green().to_string()
                };

                println!("  {} {} {}", "→".dimmed(), asset.id, usage);
            }
        }

        if report.duplicate_assets.len() > self.max_groups {
            println!(
                "  ... and {} more",
                report.duplicate_assets.len() - self.max_groups
            );
        }
        println!();
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
