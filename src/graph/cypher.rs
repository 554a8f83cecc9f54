//! Cypher statement construction.
//!
//! Data values always travel as parameters. Labels and relationship types
//! cannot be bound as parameters in Cypher, so they are spliced into the text
//! only after passing [`TypeTag::parse`].

use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

/// Row cap for `search_entities`.
pub const SEARCH_LIMIT: usize = 20;
/// Row cap for each `ask_memory` search term.
pub const TERM_LIMIT: usize = 5;

const MAX_TAG_LEN: usize = 64;

/// Property keys callers may not set through a property map: the timestamps
/// are stamped by the server and `name` is the join key.
const RESERVED_KEYS: [&str; 3] = ["name", "created", "updated"];

/// Which tool query a [`Statement`] carries. Used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Ping,
    UpsertEntity,
    LinkEntities,
    SearchEntities,
    SearchProperties,
    UpdateEntity,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::UpsertEntity => "upsert_entity",
            Self::LinkEntities => "link_entities",
            Self::SearchEntities => "search_entities",
            Self::SearchProperties => "search_properties",
            Self::UpdateEntity => "update_entity",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parametrized Cypher query.
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub text: String,
    pub params: Map<String, Value>,
}

impl Statement {
    fn new(kind: StatementKind, text: String, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { kind, text, params }
    }

    /// String parameter by name, if present.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid {role} '{value}': use letters, digits and underscores, starting with a letter or underscore")]
pub struct InvalidTypeTag {
    pub role: &'static str,
    pub value: String,
}

/// An entity label or relationship type that is safe to splice into Cypher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag(String);

impl TypeTag {
    /// Validate `raw` as an identifier-safe tag. `role` names it in the error.
    pub fn parse(raw: &str, role: &'static str) -> Result<Self, InvalidTypeTag> {
        let invalid = || InvalidTypeTag {
            role,
            value: raw.to_string(),
        };

        let mut chars = raw.chars();
        let first = chars.next().ok_or_else(invalid)?;
        if raw.len() > MAX_TAG_LEN || !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid());
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop reserved keys from caller properties.
pub fn sanitize_properties(props: &Map<String, Value>) -> Map<String, Value> {
    props
        .iter()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid property '{key}': values must be strings, numbers, booleans or null")]
pub struct NonScalarProperty {
    pub key: String,
}

/// Node properties hold scalars only. Lists and maps are refused up front;
/// a list would also break the `toString` match in the search queries.
pub fn check_scalar_properties(props: &Map<String, Value>) -> Result<(), NonScalarProperty> {
    match props.iter().find(|(_, v)| v.is_array() || v.is_object()) {
        Some((key, _)) => Err(NonScalarProperty { key: key.clone() }),
        None => Ok(()),
    }
}

pub fn ping() -> Statement {
    Statement::new(StatementKind::Ping, "RETURN 1 AS ok".into(), json!({}))
}

/// Match-or-create a node by label and name, then merge `props` into it.
pub fn upsert_entity(label: &TypeTag, name: &str, props: &Map<String, Value>) -> Statement {
    let mut props = sanitize_properties(props);
    props.insert("name".into(), Value::String(name.to_string()));

    let text = format!(
        "MERGE (n:{label} {{name: $name}})\n\
         ON CREATE SET n.created = datetime()\n\
         SET n += $props\n\
         SET n.updated = datetime()\n\
         RETURN labels(n) AS labels, n AS node"
    );
    Statement::new(
        StatementKind::UpsertEntity,
        text,
        json!({ "name": name, "props": props }),
    )
}

/// Merge a typed edge between two existing nodes. Endpoints are matched,
/// never created.
pub fn link_entities(from_name: &str, to_name: &str, relationship: &TypeTag) -> Statement {
    let text = format!(
        "MATCH (a {{name: $from_name}})\n\
         MATCH (b {{name: $to_name}})\n\
         MERGE (a)-[r:{relationship}]->(b)\n\
         ON CREATE SET r.created = datetime()\n\
         RETURN a.name AS from_name, b.name AS to_name, type(r) AS relationship"
    );
    Statement::new(
        StatementKind::LinkEntities,
        text,
        json!({ "from_name": from_name, "to_name": to_name }),
    )
}

/// Case-insensitive substring match on `name` or any property's string form.
pub fn search_entities(term: &str) -> Statement {
    let text = "MATCH (n)\n\
                WHERE toLower(toString(n.name)) CONTAINS toLower($term)\n   \
                OR ANY(prop IN keys(n) WHERE toLower(toString(n[prop])) CONTAINS toLower($term))\n\
                RETURN labels(n) AS labels, n AS node\n\
                LIMIT $limit";
    Statement::new(
        StatementKind::SearchEntities,
        text.into(),
        json!({ "term": term, "limit": SEARCH_LIMIT }),
    )
}

/// Case-insensitive substring match across every property of every node.
pub fn search_properties(term: &str) -> Statement {
    let text = "MATCH (n)\n\
                WHERE ANY(prop IN keys(n) WHERE toLower(toString(n[prop])) CONTAINS toLower($term))\n\
                RETURN labels(n) AS labels, n AS node\n\
                LIMIT $limit";
    Statement::new(
        StatementKind::SearchProperties,
        text.into(),
        json!({ "term": term, "limit": TERM_LIMIT }),
    )
}

/// Merge `props` into the existing node called `name`.
pub fn update_entity(name: &str, props: &Map<String, Value>) -> Statement {
    let props = sanitize_properties(props);
    let text = "MATCH (n {name: $name})\n\
                SET n += $props\n\
                SET n.updated = datetime()\n\
                RETURN labels(n) AS labels, n AS node";
    Statement::new(
        StatementKind::UpdateEntity,
        text.into(),
        json!({ "name": name, "props": props }),
    )
}
