//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid setup.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Links per group: {}", config.scraper.group_size);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, OutputConfig, ScraperConfig, UserAgentConfig, DEFAULT_GROUP_SIZE,
    DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_OUTPUT_DIR,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_group_size};
