//! MCP `create_entity` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for the `create_entity` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateEntityParams {
    #[schemars(description = "Name of the entity")]
    pub name: String,

    #[schemars(description = "Type of entity (Person, Project, Note, etc.)")]
    pub r#type: String,

    #[schemars(description = "Additional properties as key-value pairs")]
    pub properties: Option<Map<String, Value>>,
}
