//! Free-text memory questions: naive multi-term graph search, then LLM
//! synthesis over whatever was found.
//!
//! Relevance is left to the language model. Search terms are the first
//! whitespace tokens of the question, unstemmed; each term contributes up to
//! [`TERM_LIMIT`](crate::graph::cypher::TERM_LIMIT) records, results are not
//! deduplicated, and only the first [`MAX_CONTEXT_RECORDS`] reach the prompt.

use crate::graph::{cypher, GraphGateway};
use crate::llm::LlmGateway;
use crate::memory::render::NodeView;

/// How many leading tokens of a question become search terms.
pub const MAX_SEARCH_TERMS: usize = 3;
/// How many collected records are shown to the language model.
pub const MAX_CONTEXT_RECORDS: usize = 10;

pub const EMPTY_QUESTION: &str = "Please ask a question about your memory.";

/// Split a question into at most [`MAX_SEARCH_TERMS`] lowercase terms.
pub fn search_terms(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .take(MAX_SEARCH_TERMS)
        .map(str::to_lowercase)
        .collect()
}

/// Run one property search per term and concatenate the hits in order.
pub async fn collect_context(graph: &GraphGateway, terms: &[String]) -> Vec<NodeView> {
    let mut found = Vec::new();
    for term in terms {
        let outcome = graph.query(&cypher::search_properties(term)).await;
        if outcome.is_unavailable() {
            tracing::warn!(term = %term, "memory search unavailable for term");
        }
        found.extend(outcome.into_rows().iter().map(NodeView::from_record));
    }
    found
}

pub fn synthesis_prompt(question: &str, records: &[NodeView]) -> String {
    let mut context = format!("User Question: {question}\n\nFound in memory:\n");
    for record in records.iter().take(MAX_CONTEXT_RECORDS) {
        context.push_str(&format!("- {}\n", record.context_line()));
    }

    format!(
        "You are a helpful memory assistant. Based on this data from the user's knowledge graph:\n\n\
         {context}\n\
         Provide a helpful, conversational response to: \"{question}\""
    )
}

/// Answer a free-text question from the graph.
pub async fn ask_memory(graph: &GraphGateway, llm: &LlmGateway, question: &str) -> String {
    if question.trim().is_empty() {
        return EMPTY_QUESTION.to_string();
    }

    let header = format!("🧠 **Memory Query**: '{question}'\n\n");

    if !graph.is_connected() {
        return format!("{header}❌ Graph database not connected - cannot search memory.");
    }

    let terms = search_terms(question);
    let records = collect_context(graph, &terms).await;
    tracing::info!(terms = terms.len(), records = records.len(), "memory context collected");

    if records.is_empty() {
        return format!("{header}🔍 No specific data found for '{question}' in your memory database.");
    }

    let prompt = synthesis_prompt(question, &records);
    let answer = llm.complete(&prompt, llm.max_tokens()).await;
    format!("{header}📝 **Found**: {answer}")
}
