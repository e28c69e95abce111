//! Configuration module for kb-harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is equivalent to an empty one.
//!
//! # Example
//!
//! ```no_run
//! use kb_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kb-harvester.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, ClassificationRule, Config, CrawlerConfig, LinkFilterPolicy, OutputConfig,
    PdfConfig, RendererBackend,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
