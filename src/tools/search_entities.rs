//! MCP `search_entities` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_entities` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntitiesParams {
    #[schemars(description = "Term to search for")]
    pub search_term: String,
}
