//! CLI Commands

pub mod config;
pub mod fields;
pub mod forms;
pub mod versions;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use clap::ValueEnum;
use formkit_client::{Client, ClientConfig};
use formkit_core::wire::{schema_from_wire, schema_to_wire, WireSchema};
use formkit_core::FormSchema;

use crate::output::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Build the API client; flags and env win over the profile file
pub fn connect(
    api_url: Option<String>,
    api_key: Option<String>,
    config: &crate::config::Config,
) -> anyhow::Result<Client> {
    let base_url = api_url
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let client = Client::with_config(ClientConfig {
        base_url,
        api_key: api_key.or_else(|| config.api_key.clone()),
        ..Default::default()
    })?;
    Ok(client)
}

pub fn parse_format(value: Option<&str>) -> anyhow::Result<OutputFormat> {
    match value {
        None => Ok(OutputFormat::Table),
        Some(v) => OutputFormat::from_str(v, true)
            .map_err(|_| anyhow!("invalid output format in config: {}", v)),
    }
}

/// Read a schema file in the wire layout
pub fn read_schema(path: &Path) -> anyhow::Result<FormSchema> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let wire: WireSchema = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a form schema", path.display()))?;
    Ok(schema_from_wire(wire))
}

pub fn write_schema(path: &Path, schema: &FormSchema) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(&schema_to_wire(schema))?;
    fs::write(path, content + "\n").with_context(|| format!("failed to write {}", path.display()))
}
