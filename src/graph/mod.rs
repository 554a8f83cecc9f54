//! Graph Store Gateway.
//!
//! [`GraphStore`] is the raw backend seam (Neo4j in production, an in-memory
//! fake in tests). [`GraphGateway`] wraps an optional backend with the
//! timeout/retry policy and the soft-failure contract: it never returns an
//! error, only a [`QueryOutcome`].

pub mod cypher;
pub mod neo4j;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::GraphConfig;
use crate::error::GatewayError;
use crate::retry::RetryPolicy;
use cypher::Statement;

/// One result row: column name to value.
pub type Record = Map<String, Value>;

/// Raw access to a graph database. One call is one self-contained
/// transaction; nothing spans calls.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>, GatewayError>;
}

/// Result of a gateway query. `Empty` and `Unavailable` look the same to
/// callers that only use [`QueryOutcome::into_rows`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Record>),
    Empty,
    Unavailable,
}

impl QueryOutcome {
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Self::Rows(rows) => rows,
            Self::Empty | Self::Unavailable => Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Soft-failing front for an optional [`GraphStore`].
#[derive(Clone)]
pub struct GraphGateway {
    store: Option<Arc<dyn GraphStore>>,
    policy: RetryPolicy,
}

impl GraphGateway {
    pub fn new(store: Arc<dyn GraphStore>, policy: RetryPolicy) -> Self {
        Self {
            store: Some(store),
            policy,
        }
    }

    /// A gateway with no backend: every query is `Unavailable`.
    pub fn disconnected() -> Self {
        Self {
            store: None,
            policy: RetryPolicy::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Run `statement`, degrading any failure to [`QueryOutcome::Unavailable`].
    pub async fn query(&self, statement: &Statement) -> QueryOutcome {
        match self.try_query(statement).await {
            Ok(rows) if rows.is_empty() => QueryOutcome::Empty,
            Ok(rows) => {
                tracing::debug!(statement = %statement.kind, rows = rows.len(), "graph query ok");
                QueryOutcome::Rows(rows)
            }
            Err(GatewayError::NotConfigured) => QueryOutcome::Unavailable,
            Err(e) => {
                tracing::error!(statement = %statement.kind, error = %e, "graph query failed");
                QueryOutcome::Unavailable
            }
        }
    }

    /// Check the backend answers a trivial query.
    pub async fn probe(&self) -> Result<(), GatewayError> {
        self.try_query(&cypher::ping()).await.map(|_| ())
    }

    async fn try_query(&self, statement: &Statement) -> Result<Vec<Record>, GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::NotConfigured)?;
        self.policy
            .run(statement.kind.as_str(), || store.run(statement))
            .await
    }
}

/// Build the graph gateway from config. Missing credentials, an unusable
/// URI or a failed startup probe all leave it disconnected.
pub async fn connect(config: &GraphConfig) -> GraphGateway {
    if !config.is_configured() {
        tracing::info!("graph store not configured (set NEO4J_URI and NEO4J_PASSWORD)");
        return GraphGateway::disconnected();
    }

    let store = match neo4j::Neo4jHttpStore::new(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "graph store unusable");
            return GraphGateway::disconnected();
        }
    };

    let gateway = GraphGateway::new(Arc::new(store), RetryPolicy::for_graph(config));
    match gateway.probe().await {
        Ok(()) => {
            tracing::info!(uri = %config.uri, database = %config.database, "graph store connected");
            gateway
        }
        Err(e) => {
            tracing::warn!(uri = %config.uri, error = %e, "graph store probe failed");
            GraphGateway::disconnected()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Scripted {
        calls: AtomicUsize,
        fail_first: usize,
        rows: Vec<Record>,
    }

    #[async_trait]
    impl GraphStore for Scripted {
        async fn run(&self, _statement: &Statement) -> Result<Vec<Record>, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(GatewayError::Status { status: 503, body: "busy".into() })
            } else {
                Ok(self.rows.clone())
            }
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(1),
            max_retries: 1,
            backoff: Duration::from_millis(1),
        }
    }

    fn row() -> Record {
        let mut r = Record::new();
        r.insert("ok".into(), Value::from(1));
        r
    }

    #[tokio::test]
    async fn outcome_distinguishes_rows_empty_unavailable() {
        let rows = GraphGateway::new(
            Arc::new(Scripted { calls: AtomicUsize::new(0), fail_first: 0, rows: vec![row()] }),
            policy(),
        );
        assert_eq!(rows.query(&cypher::ping()).await, QueryOutcome::Rows(vec![row()]));

        let empty = GraphGateway::new(
            Arc::new(Scripted { calls: AtomicUsize::new(0), fail_first: 0, rows: vec![] }),
            policy(),
        );
        assert_eq!(empty.query(&cypher::ping()).await, QueryOutcome::Empty);

        let down = GraphGateway::new(
            Arc::new(Scripted { calls: AtomicUsize::new(0), fail_first: 10, rows: vec![] }),
            policy(),
        );
        let outcome = down.query(&cypher::ping()).await;
        assert!(outcome.is_unavailable());
        assert!(outcome.into_rows().is_empty());
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let store = Arc::new(Scripted { calls: AtomicUsize::new(0), fail_first: 1, rows: vec![row()] });
        let gateway = GraphGateway::new(store.clone(), policy());
        assert_eq!(gateway.query(&cypher::ping()).await.into_rows().len(), 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disconnected_gateway_is_unavailable() {
        let gateway = GraphGateway::disconnected();
        assert!(!gateway.is_connected());
        assert!(gateway.query(&cypher::ping()).await.is_unavailable());
        assert!(matches!(gateway.probe().await, Err(GatewayError::NotConfigured)));
    }

    #[tokio::test]
    async fn connect_without_credentials_stays_disconnected() {
        let gateway = connect(&GraphConfig::default()).await;
        assert!(!gateway.is_connected());
    }
}
