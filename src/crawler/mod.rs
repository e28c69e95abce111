//! Crawler module for article discovery
//!
//! This module contains the discovery half of the pipeline:
//! - Link extraction from rendered pages, bounded to the seed's site
//! - Breadth-first traversal with a per-crawl visited set and depth limit
//!
//! Fetching goes through [`crate::render::RenderSession`], so the crawler is
//! agnostic of whether pages come from a browser or a plain HTTP client.

mod frontier;
mod links;

pub use frontier::{CrawlReport, FrontierCrawler, FrontierEntry};
pub use links::LinkExtractor;
