// ABOUTME: CLI entrypoint for clickup-docs-export
// ABOUTME: Sets up logging, runs the export, and maps errors to exit codes

use clap::Parser;
use clickup_docs_export::{
    auth::resolve_token,
    cli::{error_hint, summary_lines, Cli},
    export::export,
    logger::Logger,
    util::mask_token,
    Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!();
        eprintln!("clickup-docs-export: [E{}] {}", e.exit_code(), e);
        if let Some(hint) = error_hint(&e) {
            eprintln!();
            eprintln!("{}", hint);
        }
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,clickup_docs_export=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let token = resolve_token(cli.token.clone())?;
    let options = cli.export_options(token);
    let spinner = ProgressBar::new_spinner();
    let mut logger = Logger::with_progress(cli.verbose, spinner.clone());

    logger.header("📚 ClickUp Docs Exporter");
    logger.stats("Token", mask_token(&options.token));
    logger.stats("Workspace", &options.workspace_id);
    logger.stats("Output", options.output_dir.display());
    if let Some(doc_id) = &options.doc_id {
        logger.stats("Doc ID", doc_id);
    }
    logger.blank();

    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Connecting to ClickUp...");

    let result = match export(options, &mut logger) {
        Ok(result) => {
            spinner.finish_and_clear();
            logger.success("Export complete!");
            result
        }
        Err(e) => {
            spinner.abandon_with_message("Export failed");
            return Err(e);
        }
    };

    logger.header("✨ Export Summary");
    for line in summary_lines(&result) {
        logger.plain(&line);
    }
    logger.blank();

    Ok(())
}
