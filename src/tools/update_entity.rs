//! MCP `update_entity` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for the `update_entity` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEntityParams {
    #[schemars(description = "Name of entity to update")]
    pub name: String,

    /// Merged into the node; `name`, `created` and `updated` are ignored.
    #[schemars(description = "Properties to add/update")]
    pub properties: Map<String, Value>,
}
