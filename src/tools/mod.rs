//! Tool Registry and Dispatcher.
//!
//! [`MemoryTools`] routes a tool name plus JSON arguments to its handler and
//! shapes the outcome into a [`ToolResult`]. Missing or invalid arguments come
//! back as error-flagged content; only an unknown tool name is a
//! [`DispatchError`].

pub mod add_relationship;
pub mod ask_memory;
pub mod create_entity;
pub mod registry;
pub mod search_entities;
pub mod update_entity;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use add_relationship::AddRelationshipParams;
use ask_memory::AskMemoryParams;
use create_entity::CreateEntityParams;
pub use registry::{ToolDescriptor, ToolRegistry};
use search_entities::SearchEntitiesParams;
use update_entity::UpdateEntityParams;

use crate::error::DispatchError;
use crate::graph::cypher::{self, TypeTag};
use crate::graph::GraphGateway;
use crate::llm::LlmGateway;
use crate::memory::{self, NodeView};
use crate::protocol::ToolResult;

pub const CREATE_REQUIRED: &str = "❌ Entity name and type are required";
pub const RELATIONSHIP_REQUIRED: &str = "❌ from_name, to_name and relationship are required";
pub const SEARCH_REQUIRED: &str = "❌ Search term is required";
pub const UPDATE_REQUIRED: &str = "❌ Entity name and properties are required";

/// The tool handler. Holds the catalogue and both gateways; cheap to clone
/// and shared by every request.
#[derive(Clone)]
pub struct MemoryTools {
    registry: Arc<ToolRegistry>,
    graph: GraphGateway,
    llm: LlmGateway,
}

impl MemoryTools {
    pub fn new(registry: Arc<ToolRegistry>, graph: GraphGateway, llm: LlmGateway) -> Self {
        Self {
            registry,
            graph,
            llm,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &GraphGateway {
        &self.graph
    }

    pub fn llm(&self) -> &LlmGateway {
        &self.llm
    }

    /// Dispatch `name` with `arguments`.
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<ToolResult, DispatchError> {
        tracing::info!(tool = %name, "tool call");

        if self.registry.get(name).is_none() {
            tracing::warn!(tool = %name, "unknown tool");
            return Err(DispatchError::UnknownTool(name.to_string()));
        }

        let result = match name {
            "ask_memory" => match self.args(name, arguments) {
                Ok(params) => self.ask_memory(params).await,
                Err(invalid) => invalid,
            },
            "create_entity" => match self.args(name, arguments) {
                Ok(params) => self.create_entity(params).await,
                Err(invalid) => invalid,
            },
            "add_relationship" => match self.args(name, arguments) {
                Ok(params) => self.add_relationship(params).await,
                Err(invalid) => invalid,
            },
            "search_entities" => match self.args(name, arguments) {
                Ok(params) => self.search_entities(params).await,
                Err(invalid) => invalid,
            },
            "update_entity" => match self.args(name, arguments) {
                Ok(params) => self.update_entity(params).await,
                Err(invalid) => invalid,
            },
            other => return Err(DispatchError::UnknownTool(other.to_string())),
        };

        if result.is_error {
            tracing::info!(tool = %name, text = %result.first_text(), "tool call rejected");
        }
        Ok(result)
    }

    /// Typed view of tool arguments. `Ok(None)` when a required argument is
    /// absent or null, so the handler answers with its "required" message;
    /// present arguments of the wrong shape are rejected here.
    fn args<T: DeserializeOwned>(&self, tool: &str, arguments: &Value) -> Result<Option<T>, ToolResult> {
        let missing = self
            .registry
            .required_args(tool)
            .iter()
            .any(|key| arguments.get(key).map_or(true, Value::is_null));
        if missing {
            return Ok(None);
        }

        serde_json::from_value(arguments.clone())
            .map(Some)
            .map_err(|e| ToolResult::error(format!("❌ Invalid arguments for {tool}: {e}")))
    }

    async fn ask_memory(&self, params: Option<AskMemoryParams>) -> ToolResult {
        let question = params.map(|p| p.question).unwrap_or_default();
        ToolResult::text(memory::ask_memory(&self.graph, &self.llm, &question).await)
    }

    async fn create_entity(&self, params: Option<CreateEntityParams>) -> ToolResult {
        let Some(params) = params.filter(|p| !p.name.is_empty() && !p.r#type.is_empty()) else {
            return ToolResult::error(CREATE_REQUIRED);
        };
        let label = match TypeTag::parse(&params.r#type, "entity type") {
            Ok(label) => label,
            Err(e) => return ToolResult::error(format!("❌ {e}")),
        };

        let properties = params.properties.unwrap_or_default();
        if let Err(e) = cypher::check_scalar_properties(&properties) {
            return ToolResult::error(format!("❌ {e}"));
        }
        let statement = cypher::upsert_entity(&label, &params.name, &properties);
        if self.graph.query(&statement).await.into_rows().is_empty() {
            return ToolResult::error(format!("❌ Failed to create entity: {}", params.name));
        }

        let mut text = format!("✅ Created {label}: {}", params.name);
        let stored = cypher::sanitize_properties(&properties);
        if !stored.is_empty() {
            text.push_str(&format!(" with properties: {}", Value::Object(stored)));
        }
        ToolResult::text(text)
    }

    async fn add_relationship(&self, params: Option<AddRelationshipParams>) -> ToolResult {
        let Some(params) = params.filter(|p| {
            !p.from_name.is_empty() && !p.to_name.is_empty() && !p.relationship.is_empty()
        }) else {
            return ToolResult::error(RELATIONSHIP_REQUIRED);
        };
        let relationship = match TypeTag::parse(&params.relationship, "relationship type") {
            Ok(tag) => tag,
            Err(e) => return ToolResult::error(format!("❌ {e}")),
        };

        let statement = cypher::link_entities(&params.from_name, &params.to_name, &relationship);
        let arrow = format!("{} -{relationship}-> {}", params.from_name, params.to_name);
        if self.graph.query(&statement).await.into_rows().is_empty() {
            return ToolResult::error(format!(
                "❌ Failed to create relationship {arrow} (entities might not exist)"
            ));
        }
        ToolResult::text(format!("✅ Created relationship: {arrow}"))
    }

    async fn search_entities(&self, params: Option<SearchEntitiesParams>) -> ToolResult {
        let Some(params) = params.filter(|p| !p.search_term.is_empty()) else {
            return ToolResult::error(SEARCH_REQUIRED);
        };
        let term = params.search_term;

        let rows = self
            .graph
            .query(&cypher::search_entities(&term))
            .await
            .into_rows();
        if rows.is_empty() {
            return ToolResult::text(format!("🔍 No entities found matching '{term}'"));
        }

        let mut text = format!("🔍 Found {} entities matching '{term}':\n\n", rows.len());
        for row in &rows {
            text.push_str(&NodeView::from_record(row).listing());
        }
        ToolResult::text(text)
    }

    async fn update_entity(&self, params: Option<UpdateEntityParams>) -> ToolResult {
        let Some(params) = params.filter(|p| {
            !p.name.is_empty() && !cypher::sanitize_properties(&p.properties).is_empty()
        }) else {
            return ToolResult::error(UPDATE_REQUIRED);
        };
        if let Err(e) = cypher::check_scalar_properties(&params.properties) {
            return ToolResult::error(format!("❌ {e}"));
        }

        let statement = cypher::update_entity(&params.name, &params.properties);
        if self.graph.query(&statement).await.into_rows().is_empty() {
            return ToolResult::text(format!("⚠️ Entity '{}' not found", params.name));
        }

        let applied = Value::Object(cypher::sanitize_properties(&params.properties));
        ToolResult::text(format!("✅ Updated {} with: {applied}", params.name))
    }
}
