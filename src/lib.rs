//! Graph memory for AI agents: entity tools and LLM-synthesized answers over JSON-RPC.
//!
//! GraphMind exposes five [MCP](https://modelcontextprotocol.io/)-style tools over an
//! HTTP JSON-RPC endpoint. Each is backed by a Neo4j query, a language-model call, or both:
//!
//! | Tool | Required args | Effect |
//! |------|---------------|--------|
//! | `ask_memory` | `question` | search the graph, synthesize an answer with the LLM |
//! | `create_entity` | `name`, `type` | upsert a labelled node by name |
//! | `add_relationship` | `from_name`, `to_name`, `relationship` | merge a typed edge between existing nodes |
//! | `search_entities` | `search_term` | case-insensitive substring search, up to 20 nodes |
//! | `update_entity` | `name`, `properties` | merge properties into an existing node |
//!
//! Every call is stateless. Both backends are optional: an unconfigured or
//! unreachable backend degrades to an empty result or a placeholder string
//! rather than an error.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`graph`]: Graph Store Gateway, Cypher statements, and the Neo4j HTTP backend
//! - [`llm`]: Language-Model Gateway and the chat-completions backend
//! - [`memory`]: Memory Query Composer and record rendering
//! - [`tools`]: Tool Registry and Dispatcher
//! - [`protocol`]: JSON-RPC envelope and tool-result types
//! - [`server`]: axum HTTP transport

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod protocol;
pub mod retry;
pub mod server;
pub mod tools;
