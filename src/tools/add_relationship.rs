//! MCP `add_relationship` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `add_relationship` MCP tool.
///
/// Creates a directed, typed edge between two entities that already exist.
/// Idempotent on the (from, relationship, to) triple.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddRelationshipParams {
    /// Name of the source entity.
    #[schemars(description = "Name of the source entity")]
    pub from_name: String,

    /// Name of the target entity.
    #[schemars(description = "Name of the target entity")]
    pub to_name: String,

    /// Relationship type (e.g. `"KNOWS"`, `"WORKS_ON"`).
    #[schemars(description = "Type of relationship (KNOWS, WORKS_ON, RELATED_TO, etc.)")]
    pub relationship: String,
}
