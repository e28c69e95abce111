//! Output module for exporting harvested content and reporting crawls
//!
//! This module handles:
//! - Exporting content items in the knowledge-base JSON format
//! - Printing crawl reports and writing markdown crawl summaries

mod export;
mod report;

pub use export::{
    normalize_content_type, write_export, ExportItem, KnowledgeBaseExport,
    SUPPORTED_CONTENT_TYPES,
};
pub use report::{format_crawl_summary, print_crawl_report, write_crawl_summary};
