use std::sync::Arc;

use agentloop::{
    agent::Orchestrator,
    gateway::{
        TextGateway,
        openai::{OpenAiGateway, OpenAiGatewayConfig},
    },
    shared::OrchestratorConfig,
    tools::builtin::{ContentGenerator, ContentKind, EmailSender, KnowledgeQuery, QueryMode},
    utils::truncate_chars,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let gateway_config = OpenAiGatewayConfig::from_env();
    info!("Using model {} at {}", gateway_config.model, gateway_config.base_url);
    let gateway: Arc<dyn TextGateway> = Arc::new(OpenAiGateway::new(gateway_config));

    // No document store or mail transport is wired here; those capabilities
    // report a configuration error when selected.
    let blog =
        ContentGenerator::new(ContentKind::BlogPost, gateway.clone()).with_output_dir("outputs");
    let newsletter =
        ContentGenerator::new(ContentKind::Newsletter, gateway.clone()).with_output_dir("outputs");
    let mut orchestrator = Orchestrator::new(gateway, OrchestratorConfig::default())
        .with_capability(Arc::new(KnowledgeQuery::new(QueryMode::Answer, None)))
        .with_capability(Arc::new(KnowledgeQuery::new(QueryMode::Search, None)))
        .with_capability(Arc::new(blog))
        .with_capability(Arc::new(newsletter))
        .with_capability(Arc::new(EmailSender::new(None)));

    println!("Commands: tools, stats, save, quit. Anything else runs as a task.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "quit" | "exit" => break,
            "tools" => println!("{}", orchestrator.registry().describe()),
            "stats" => {
                let summary = orchestrator.performance_summary();
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            "save" => {
                let path = orchestrator.evaluator().save_report(None).await?;
                println!("Report written to {}", path.display());
            }
            task => {
                let record = orchestrator.execute_task(task, true).await;
                for execution in &record.execution_results {
                    let status = if execution.result.success { "ok" } else { "failed" };
                    println!("[{}] {}", execution.tool, status);
                    if let Some(value) = &execution.result.result {
                        match value.as_str() {
                            Some(text) => println!("{}", text),
                            None => println!("{}", serde_json::to_string_pretty(value)?),
                        }
                    }
                    if let Some(error) = &execution.result.error {
                        println!("error: {}", error);
                    }
                }
                if let Some(reflection) = &record.reflection {
                    println!("\nReflection: {}", truncate_chars(&reflection.analysis, 100));
                }
                println!("Overall score: {:.2}", record.evaluation.overall);
            }
        }
    }

    Ok(())
}
