//! Configuration model for gerrit-cl.
//!
//! This module defines the Config struct that represents the optional
//! `.gerrit-cl.yaml` file at the repository root. It supports
//! forward-compatible YAML parsing (unknown fields are ignored), defaults
//! for every field, and validation of config values.

mod model;
mod operations;


pub use model::{CONFIG_FILE_NAME, Config};
