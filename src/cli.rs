// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Maps flags to ExportOptions and renders the final summary

use crate::api::DEFAULT_API_BASE;
use crate::export::{ExportOptions, ExportResult, DEFAULT_OUTPUT_DIR};
use crate::Error;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Warnings listed individually before the rest are folded into a count.
const MAX_LISTED_WARNINGS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "clickup-docs-export")]
#[command(about = "Export ClickUp Docs and Wikis to markdown files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// ClickUp API token (pk_xxx or personal token); falls back to CLICKUP_API_TOKEN
    #[arg(short, long)]
    pub token: Option<String>,

    /// ClickUp Workspace ID
    #[arg(short, long)]
    pub workspace: String,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Export a single doc by ID
    #[arg(short, long)]
    pub doc: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Delay after each page content fetch, in ms
    #[arg(long, default_value_t = 100)]
    pub page_delay_ms: u64,

    /// Disable request and page delays (not recommended)
    #[arg(long)]
    pub no_throttle: bool,
}

impl Cli {
    pub fn export_options(&self, token: String) -> ExportOptions {
        let mut options = ExportOptions::new(token, self.workspace.clone());
        options.output_dir = self.output.clone();
        options.doc_id = self.doc.clone();
        options.api_base = Some(self.api_base.clone());
        options.page_delay = Duration::from_millis(self.page_delay_ms);

        if self.no_throttle {
            options.page_delay = Duration::ZERO;
            options.request_delay = Duration::ZERO;
        }

        options
    }
}

/// Lines printed after a successful export.
pub fn summary_lines(result: &ExportResult) -> Vec<String> {
    let mut lines = vec![
        format!("  Docs exported: {}", result.total_docs),
        format!("  Pages exported: {}", result.total_pages),
        format!("  Output directory: {}", result.output_dir.display()),
    ];

    if !result.errors.is_empty() {
        lines.push(String::new());
        lines.push(format!("  ⚠ {} warning(s):", result.errors.len()));
        for err in result.errors.iter().take(MAX_LISTED_WARNINGS) {
            lines.push(format!("    - {}", err));
        }
        if result.errors.len() > MAX_LISTED_WARNINGS {
            lines.push(format!(
                "    ... and {} more",
                result.errors.len() - MAX_LISTED_WARNINGS
            ));
        }
    }

    lines
}

/// Extra guidance for failures the user can fix themselves.
pub fn error_hint(error: &Error) -> Option<&'static str> {
    if error.is_unauthorized() {
        Some(
            "Tip: Make sure your API token is valid.\n\
             Get your token at: https://app.clickup.com/settings/apps",
        )
    } else {
        None
    }
}
