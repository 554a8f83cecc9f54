#![allow(dead_code)]

use async_trait::async_trait;
use graphmind::error::GatewayError;
use graphmind::graph::cypher::{Statement, StatementKind};
use graphmind::graph::{GraphGateway, GraphStore, Record};
use graphmind::llm::{LanguageModel, LlmGateway};
use graphmind::protocol::ToolResult;
use graphmind::retry::RetryPolicy;
use graphmind::tools::{MemoryTools, ToolRegistry};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Node {
    labels: Vec<String>,
    props: Map<String, Value>,
}

struct Edge {
    from: usize,
    to: usize,
    rel: String,
}

#[derive(Default)]
struct GraphState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// In-memory stand-in for Neo4j. Interprets the statements built by
/// `graphmind::graph::cypher` with the same merge/match semantics, and
/// counts every call.
#[derive(Default)]
pub struct InMemoryGraph {
    state: Mutex<GraphState>,
    calls: AtomicUsize,
}

impl InMemoryGraph {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().unwrap().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.state.lock().unwrap().edges.len()
    }

    /// Number of `rel` edges from the node named `from` to the node named `to`.
    pub fn edges_between(&self, from: &str, rel: &str, to: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .edges
            .iter()
            .filter(|e| {
                e.rel == rel
                    && state.nodes[e.from].props.get("name") == Some(&json!(from))
                    && state.nodes[e.to].props.get("name") == Some(&json!(to))
            })
            .count()
    }

    pub fn property(&self, name: &str, key: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .find(|n| n.props.get("name") == Some(&json!(name)))
            .and_then(|n| n.props.get(key).cloned())
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).map(|i| i + start.len()).unwrap_or(0);
    let to = text[from..].find(end).map(|i| from + i).unwrap_or(text.len());
    &text[from..to]
}

fn node_record(node: &Node) -> Record {
    let mut record = Record::new();
    record.insert("labels".into(), json!(node.labels));
    record.insert("node".into(), Value::Object(node.props.clone()));
    record
}

fn named(state: &GraphState, name: &str) -> Vec<usize> {
    (0..state.nodes.len())
        .filter(|&i| state.nodes[i].props.get("name") == Some(&json!(name)))
        .collect()
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.state.lock().unwrap();
        let state: &mut GraphState = &mut guard;
        let params = &statement.params;
        let name_of = |key: &str| statement.param_str(key).unwrap_or_default().to_string();

        let rows = match statement.kind {
            StatementKind::Ping => vec![json!({"ok": 1}).as_object().unwrap().clone()],

            StatementKind::UpsertEntity => {
                let label = between(&statement.text, "MERGE (n:", " {").to_string();
                let name = name_of("name");
                let idx = match state.nodes.iter().position(|n| {
                    n.labels.contains(&label) && n.props.get("name") == Some(&json!(name))
                }) {
                    Some(idx) => idx,
                    None => {
                        let mut props = Map::new();
                        props.insert("name".into(), json!(name));
                        props.insert("created".into(), now());
                        state.nodes.push(Node { labels: vec![label], props });
                        state.nodes.len() - 1
                    }
                };
                let node = &mut state.nodes[idx];
                if let Some(Value::Object(props)) = params.get("props") {
                    node.props.extend(props.clone());
                }
                node.props.insert("updated".into(), now());
                vec![node_record(node)]
            }

            StatementKind::LinkEntities => {
                let rel = between(&statement.text, "[r:", "]").to_string();
                let (from, to) = (name_of("from_name"), name_of("to_name"));
                let sources = named(state, &from);
                let targets = named(state, &to);

                let mut rows = Vec::new();
                for &a in &sources {
                    for &b in &targets {
                        let exists = state
                            .edges
                            .iter()
                            .any(|e| e.from == a && e.to == b && e.rel == rel);
                        if !exists {
                            state.edges.push(Edge { from: a, to: b, rel: rel.clone() });
                        }
                        rows.push(
                            json!({"from_name": from, "to_name": to, "relationship": rel})
                                .as_object()
                                .unwrap()
                                .clone(),
                        );
                    }
                }
                rows
            }

            StatementKind::SearchEntities | StatementKind::SearchProperties => {
                let term = name_of("term").to_lowercase();
                let limit = params.get("limit").and_then(Value::as_u64).unwrap_or(u64::MAX) as usize;
                state
                    .nodes
                    .iter()
                    .filter(|n| {
                        n.props
                            .values()
                            .any(|v| string_form(v).to_lowercase().contains(&term))
                    })
                    .take(limit)
                    .map(node_record)
                    .collect()
            }

            StatementKind::UpdateEntity => {
                let name = name_of("name");
                let props = params.get("props").and_then(Value::as_object).cloned().unwrap_or_default();
                let mut rows = Vec::new();
                for node in state
                    .nodes
                    .iter_mut()
                    .filter(|n| n.props.get("name") == Some(&json!(name)))
                {
                    node.props.extend(props.clone());
                    node.props.insert("updated".into(), now());
                    rows.push(node_record(node));
                }
                rows
            }
        };

        Ok(rows)
    }
}

/// Store that is reachable at startup but fails every query afterwards.
#[derive(Default)]
pub struct FailingGraph {
    calls: AtomicUsize,
}

impl FailingGraph {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphStore for FailingGraph {
    async fn run(&self, _statement: &Statement) -> Result<Vec<Record>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Status {
            status: 503,
            body: "database unavailable".into(),
        })
    }
}

/// Language model fake: records every prompt and token budget, and answers
/// with a fixed reply.
pub struct RecordingLlm {
    reply: String,
    prompts: Mutex<Vec<String>>,
    budgets: Mutex<Vec<u32>>,
}

impl RecordingLlm {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
            budgets: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn budgets(&self) -> Vec<u32> {
        self.budgets.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for RecordingLlm {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.budgets.lock().unwrap().push(max_tokens);
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

pub fn test_policy() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(5),
        max_retries: 0,
        backoff: Duration::from_millis(1),
    }
}

/// Tool handler wired to the given fakes. `None` leaves that backend unconfigured.
pub fn test_tools(graph: Option<Arc<InMemoryGraph>>, llm: Option<Arc<RecordingLlm>>) -> MemoryTools {
    let graph = match graph {
        Some(g) => GraphGateway::new(g, test_policy()),
        None => GraphGateway::disconnected(),
    };
    let llm = match llm {
        Some(l) => LlmGateway::new(l, test_policy()),
        None => LlmGateway::unconfigured(),
    };
    tools_with(graph, llm)
}

/// Tool handler over explicitly built gateways.
pub fn tools_with(graph: GraphGateway, llm: LlmGateway) -> MemoryTools {
    MemoryTools::new(Arc::new(ToolRegistry::builtin()), graph, llm)
}

/// Call a tool that is known to exist.
pub async fn call(tools: &MemoryTools, name: &str, args: Value) -> ToolResult {
    tools.call(name, &args).await.unwrap()
}
