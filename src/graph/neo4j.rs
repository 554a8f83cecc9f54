//! Neo4j backend over the HTTP transactional endpoint.
//!
//! Each statement is posted to `/db/{database}/tx/commit`, which opens,
//! runs and commits an implicit transaction in one round trip.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::cypher::Statement;
use super::{GraphStore, Record};
use crate::config::GraphConfig;
use crate::error::GatewayError;

pub struct Neo4jHttpStore {
    client: reqwest::Client,
    commit_url: String,
    user: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

impl Neo4jHttpStore {
    /// Build a client for `config.uri`, which must be the server's HTTP(S)
    /// address (e.g. `http://localhost:7474`).
    pub fn new(config: &GraphConfig) -> Result<Self, GatewayError> {
        let base = config.uri.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GatewayError::Config(format!(
                "graph uri must be an http(s) endpoint, got {base}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            commit_url: format!("{base}/db/{}/tx/commit", config.database),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpStore {
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>, GatewayError> {
        let body = json!({
            "statements": [{
                "statement": statement.text,
                "parameters": statement.params,
                "resultDataContents": ["row"],
            }]
        });

        let response = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CommitResponse = response.json().await?;
        decode(payload)
    }
}

fn decode(payload: CommitResponse) -> Result<Vec<Record>, GatewayError> {
    if let Some(err) = payload.errors.into_iter().next() {
        return Err(GatewayError::Query {
            code: err.code,
            message: err.message,
        });
    }

    let Some(result) = payload.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    result
        .data
        .into_iter()
        .map(|data| {
            if data.row.len() != result.columns.len() {
                return Err(GatewayError::Decode(format!(
                    "row has {} values for {} columns",
                    data.row.len(),
                    result.columns.len()
                )));
            }
            Ok(result.columns.iter().cloned().zip(data.row).collect())
        })
        .collect()
}
