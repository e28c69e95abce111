//! Crawl report rendering
//!
//! Prints a [`CrawlReport`] to stdout or writes it as a markdown summary.

use crate::crawler::CrawlReport;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", report.fetched);
    println!("  Content URLs found: {}", report.found.len());
    println!("  Failed fetches: {}", report.failed.len());
    println!("  Links already visited: {}", report.skipped_visited);
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {:.2}s", duration);
    }
    if report.capped {
        println!("  Page limit reached: crawl stopped early");
    }
    println!();

    if !report.found.is_empty() {
        println!("Content URLs ({}):", report.found.len());
        for url in &report.found {
            println!("  - {}", url);
        }
        println!();
    }

    if !report.failed.is_empty() {
        println!("Failures ({}):", report.failed.len());
        for (url, reason) in &report.failed {
            println!("  - {}: {}", url, reason);
        }
        println!();
    }

    let success_rate = if report.fetched > 0 {
        (report.fetched.saturating_sub(report.failed.len()) as f64 / report.fetched as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched successfully)",
        success_rate,
        report.fetched.saturating_sub(report.failed.len()),
        report.fetched
    );
}

/// Writes a markdown summary of the crawl to `output_path`
pub fn write_crawl_summary(report: &CrawlReport, seed: &str, output_path: &Path) -> Result<()> {
    let markdown = format_crawl_summary(report, seed);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_crawl_summary(report: &CrawlReport, seed: &str) -> String {
    let mut md = String::new();

    md.push_str("# Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", seed));
    if let Some(started) = report.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    md.push_str(&format!("- **Pages fetched**: {}\n", report.fetched));
    if report.capped {
        md.push_str("- **Page limit reached**: yes\n");
    }
    md.push('\n');

    md.push_str(&format!("## Content URLs ({})\n\n", report.found.len()));
    if report.found.is_empty() {
        md.push_str("_None found._\n");
    }
    for url in &report.found {
        md.push_str(&format!("- <{}>\n", url));
    }
    md.push('\n');

    if !report.failed.is_empty() {
        md.push_str(&format!("## Failures ({})\n\n", report.failed.len()));
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for (url, reason) in &report.failed {
            md.push_str(&format!("| {} | {} |\n", url, reason.replace('|', "\\|")));
        }
        md.push('\n');
    }

    md
}
