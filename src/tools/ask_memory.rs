//! MCP `ask_memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `ask_memory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AskMemoryParams {
    #[schemars(description = "Question about your memory, projects, people, etc.")]
    pub question: String,
}
