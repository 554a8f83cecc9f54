//! Static catalogue of tool descriptors surfaced by `tools/list`.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};

use super::add_relationship::AddRelationshipParams;
use super::ask_memory::AskMemoryParams;
use super::create_entity::CreateEntityParams;
use super::search_entities::SearchEntitiesParams;
use super::update_entity::UpdateEntityParams;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool catalogue. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn builtin() -> Self {
        Self {
            tools: vec![
                descriptor::<AskMemoryParams>(
                    "ask_memory",
                    "Ask intelligent questions about your stored memory using language-model analysis",
                ),
                descriptor::<CreateEntityParams>(
                    "create_entity",
                    "Create a new entity (person, project, note, etc.) in your memory",
                ),
                descriptor::<AddRelationshipParams>(
                    "add_relationship",
                    "Create a relationship between two entities",
                ),
                descriptor::<SearchEntitiesParams>(
                    "search_entities",
                    "Search for entities in your memory database",
                ),
                descriptor::<UpdateEntityParams>(
                    "update_entity",
                    "Update properties of an existing entity",
                ),
            ],
        }
    }

    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Required argument names advertised for `name`.
    pub fn required_args(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .and_then(|t| t.input_schema.get("required"))
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

fn descriptor<T: JsonSchema>(name: &'static str, description: &'static str) -> ToolDescriptor {
    let schema = schemars::schema_for!(T);
    let mut input_schema =
        serde_json::to_value(&schema).unwrap_or_else(|_| json!({ "type": "object" }));

    // Drop the draft marker and the Rust type name.
    if let Some(obj) = input_schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }

    ToolDescriptor {
        name,
        description,
        input_schema,
    }
}
