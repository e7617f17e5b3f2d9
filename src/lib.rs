// ABOUTME: Public library API for ClickUp Docs export
// ABOUTME: Re-exports core modules for the CLI and external use

pub mod api;
pub mod auth;
pub mod cli;
pub mod convert;
pub mod error;
pub mod export;
pub mod logger;
pub mod model;
pub mod storage;
pub mod util;

pub use error::{Error, ErrorKind, Result};
pub use export::{ExportOptions, ExportResult, Exporter};
pub use logger::Logger;
pub use model::{Document, PageNode, Workspace};
