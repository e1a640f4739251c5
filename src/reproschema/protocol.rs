// src/reproschema/protocol.rs

//! Converter YAML config inspection
//!
//! The reproschema converter names its generated directory after the
//! `protocol_name` key in the YAML config, so staging has to read it from
//! there rather than hardcode it.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConverterConfig {
    protocol_name: String,
}

/// Read `protocol_name` from the converter YAML config
pub fn protocol_name(yaml: &Path) -> Result<String> {
    let content = fs::read_to_string(yaml)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", yaml.display(), e)))?;
    let config: ConverterConfig = serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", yaml.display(), e)))?;

    if config.protocol_name.trim().is_empty() {
        return Err(Error::Config(format!(
            "protocol_name is empty in {}",
            yaml.display()
        )));
    }

    Ok(config.protocol_name)
}
