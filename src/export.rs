// ABOUTME: Core export logic walking docs and page trees into markdown files
// ABOUTME: Records per-page and per-doc failures as warnings instead of aborting

use crate::{
    api::ApiClient,
    convert::{doc_inline_content, render_markdown},
    logger::Logger,
    model::{self, Document, PageNode},
    storage::{self, INDEX_FILE},
    Result,
};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "./clickup-docs";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub token: String,
    pub workspace_id: String,
    pub output_dir: PathBuf,
    /// Export only this doc instead of every doc in the workspace.
    pub doc_id: Option<String>,
    /// Pause after every page content fetch.
    pub page_delay: Duration,
    /// Pause before every API request.
    pub request_delay: Duration,
    pub api_base: Option<String>,
}

impl ExportOptions {
    pub fn new(token: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        ExportOptions {
            token: token.into(),
            workspace_id: workspace_id.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            doc_id: None,
            page_delay: Duration::from_millis(100),
            request_delay: Duration::from_millis(100),
            api_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub total_docs: usize,
    pub total_pages: usize,
    pub output_dir: PathBuf,
    pub errors: Vec<String>,
}

/// Builds a client from the options and runs a full export.
pub fn export(options: ExportOptions, logger: &mut Logger) -> Result<ExportResult> {
    let client = ApiClient::new(options.token.clone(), options.api_base.clone())?
        .with_request_delay(options.request_delay);
    Exporter::new(&client, logger, options).export()
}

pub struct Exporter<'a> {
    client: &'a ApiClient,
    logger: &'a mut Logger,
    options: ExportOptions,
    exported_pages: usize,
    errors: Vec<String>,
}

impl<'a> Exporter<'a> {
    pub fn new(client: &'a ApiClient, logger: &'a mut Logger, options: ExportOptions) -> Self {
        Exporter {
            client,
            logger,
            options,
            exported_pages: 0,
            errors: Vec::new(),
        }
    }

    pub fn export(mut self) -> Result<ExportResult> {
        storage::ensure_dir(&self.options.output_dir)?;

        self.logger.info("Verifying workspace access...");
        let workspaces = self.client.get_workspaces()?;

        // The id is only checked here; doc listing is scoped server-side anyway.
        let workspace_id = &self.options.workspace_id;
        if !workspaces.is_empty() && !workspaces.iter().any(|w| &w.id == workspace_id) {
            self.logger.warn(&format!(
                "Workspace {} not found among {} accessible workspace(s), continuing with it anyway",
                workspace_id,
                workspaces.len()
            ));
        }

        let docs = match &self.options.doc_id {
            Some(doc_id) => {
                self.logger.info(&format!("Fetching doc {}...", doc_id));
                vec![self.client.get_doc(workspace_id, doc_id)?]
            }
            None => {
                self.logger.info("Fetching all docs...");
                self.client.get_docs(workspace_id)?
            }
        };

        self.logger
            .success(&format!("Found {} doc(s) to export", docs.len()));

        for doc in &docs {
            if let Err(e) = self.export_doc(doc) {
                self.logger
                    .error(&format!("Failed to export \"{}\": {}", doc.display_name(), e));
                self.errors
                    .push(format!("Failed to export doc \"{}\": {}", doc.display_name(), e));
            }
        }

        Ok(ExportResult {
            total_docs: docs.len(),
            total_pages: self.exported_pages,
            output_dir: fs::canonicalize(&self.options.output_dir)?,
            errors: self.errors,
        })
    }

    fn export_doc(&mut self, doc: &Document) -> Result<()> {
        let doc_name = doc.display_name();
        let doc_dir = storage::node_dir(&self.options.output_dir, doc_name);

        self.logger.info(&format!("Exporting: {}", doc_name));
        storage::ensure_dir(&doc_dir)?;

        self.logger
            .debug(&format!("Fetching page hierarchy for {}...", doc.id));
        let pages = match self
            .client
            .get_page_listing(&self.options.workspace_id, &doc.id)
        {
            Ok(pages) => {
                if self.logger.is_verbose() {
                    self.logger
                        .debug(&format!("Found {} pages", model::count_nodes(&pages)));
                }
                pages
            }
            Err(e) => {
                self.logger.warn(&format!("Could not fetch pages: {}", e));
                Vec::new()
            }
        };

        if pages.is_empty() {
            let content = doc_inline_content(doc);
            return self.write_page(&doc_dir.join(INDEX_FILE), doc_name, &content);
        }

        self.export_pages(&doc.id, pages, &doc_dir)
    }

    /// Depth-first, pre-order walk driven by an explicit stack.
    fn export_pages(&mut self, doc_id: &str, pages: Vec<PageNode>, doc_dir: &Path) -> Result<()> {
        let mut stack: Vec<(PageNode, PathBuf)> = pages
            .into_iter()
            .rev()
            .map(|page| (page, doc_dir.to_path_buf()))
            .collect();

        while let Some((mut page, parent_dir)) = stack.pop() {
            let Some(page_id) = page.id() else {
                continue;
            };
            let page_name = page.name().to_string();

            let content = match self
                .client
                .get_page_content(&self.options.workspace_id, doc_id, &page_id)
            {
                Ok(response) => model::page_content(&response),
                Err(e) => {
                    self.logger.debug(&format!(
                        "Could not fetch content for \"{}\": {}",
                        page_name, e
                    ));
                    self.errors
                        .push(format!("Failed to fetch content for \"{}\"", page_name));
                    String::new()
                }
            };

            self.pause();

            let children = page.take_children();
            if children.is_empty() {
                let file = storage::leaf_file(&parent_dir, &page_name);
                self.write_page(&file, &page_name, &content)?;
            } else {
                let page_dir = storage::node_dir(&parent_dir, &page_name);
                storage::ensure_dir(&page_dir)?;
                self.write_page(&page_dir.join(INDEX_FILE), &page_name, &content)?;

                stack.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| (child, page_dir.clone())),
                );
            }

            self.logger.debug(&format!("Exported: {}", page_name));
        }

        Ok(())
    }

    fn write_page(&mut self, path: &Path, title: &str, content: &str) -> Result<()> {
        let markdown = render_markdown(title, content, Utc::now());
        storage::write_file(path, &markdown)?;
        self.exported_pages += 1;
        Ok(())
    }

    fn pause(&self) {
        if !self.options.page_delay.is_zero() {
            std::thread::sleep(self.options.page_delay);
        }
    }
}
