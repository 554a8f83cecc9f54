//! CLI `doctor` command: probe both backends and print a connectivity report.

use anyhow::Result;

use crate::config::GraphMindConfig;
use crate::graph;
use crate::llm::LlmGateway;

/// Probe the graph store and language model and print what works.
pub async fn doctor(config: &GraphMindConfig) -> Result<()> {
    println!("GraphMind Health Report");
    println!("=======================");
    println!();

    println!("Graph store:");
    if config.graph.is_configured() {
        println!("  URI:             {}", config.graph.uri);
        println!("  Database:        {}", config.graph.database);
        println!("  User:            {}", config.graph.user);
        let gateway = graph::connect(&config.graph).await;
        if gateway.is_connected() {
            println!("  Status:          OK (connected)");
        } else {
            println!("  Status:          UNREACHABLE (see log for details)");
        }
    } else {
        println!("  Status:          not configured (set NEO4J_URI and NEO4J_PASSWORD)");
    }
    println!();

    println!("Language model:");
    let llm = LlmGateway::from_config(&config.llm);
    match llm.model_name() {
        Some(model) => {
            println!("  Model:           {model}");
            println!("  Endpoint:        {}", config.llm.base_url);
            match llm.try_complete("Reply with the single word: ok", 5).await {
                Ok(reply) => println!("  Status:          OK (replied {reply:?})"),
                Err(e) => println!("  Status:          FAILED ({e})"),
            }
        }
        None => println!("  Status:          not configured (set OPENAI_API_KEY)"),
    }
    println!();

    println!("Server:");
    println!("  Listen address:  {}", config.bind_addr());
    println!("  Log level:       {}", config.server.log_level);

    Ok(())
}
