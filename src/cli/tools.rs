//! CLI `tools` command: print the tool catalogue as JSON.

use anyhow::{Context, Result};

use crate::tools::ToolRegistry;

pub fn print_tools() -> Result<()> {
    let registry = ToolRegistry::builtin();
    let json = serde_json::to_string_pretty(&serde_json::json!({ "tools": registry.list() }))
        .context("failed to serialize tool catalogue")?;
    println!("{json}");
    Ok(())
}
