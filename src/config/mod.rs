//! Configuration module for Link-Patrol
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file, `Config::default()` applies.
//!
//! # Example
//!
//! ```no_run
//! use link_patrol::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("patrol.toml")).unwrap();
//! println!("Pages time out after {}ms", config.crawler.page_timeout);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
