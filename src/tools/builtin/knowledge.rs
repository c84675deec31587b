use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    error::{Result, agent_error::AgentError},
    tools::{
        builtin::{count_arg, string_arg},
        capability::Capability,
        model::{Arguments, CapabilityDescriptor, ExecutionResult},
    },
};

const DEFAULT_RESULTS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub text: String,
    pub source: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub answer: String,
    pub context: Vec<KnowledgeChunk>,
}

/// Document store behind the retrieval capabilities.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Raw chunks ranked by relevance, at most `n_results`.
    async fn search(&self, query: &str, n_results: usize) -> Result<Vec<KnowledgeChunk>>;

    /// An answer generated from the `n_results` best chunks, with those chunks.
    async fn answer(&self, query: &str, n_results: usize) -> Result<GroundedAnswer>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// `rag_query`: answer the question from retrieved context.
    Answer,
    /// `knowledge_search`: return the retrieved chunks only.
    Search,
}

pub struct KnowledgeQuery {
    mode: QueryMode,
    descriptor: CapabilityDescriptor,
    backend: Option<Arc<dyn KnowledgeBase>>,
}

impl KnowledgeQuery {
    pub fn new(mode: QueryMode, backend: Option<Arc<dyn KnowledgeBase>>) -> Self {
        let descriptor = match mode {
            QueryMode::Answer => CapabilityDescriptor::new(
                "rag_query",
                "Query the knowledge base to retrieve information. Use this when you need to \
                 find specific information from the loaded documents.",
            )
            .with_parameter("query", "str - The question or search query")
            .with_parameter(
                "n_results",
                "int - Number of relevant chunks to retrieve (default: 5)",
            ),
            QueryMode::Search => CapabilityDescriptor::new(
                "knowledge_search",
                "Search for relevant information in the knowledge base. Returns raw context \
                 chunks without generating an answer.",
            )
            .with_parameter("query", "str - The search query")
            .with_parameter("n_results", "int - Number of results (default: 5)"),
        };
        Self {
            mode,
            descriptor,
            backend,
        }
    }
}

#[async_trait]
impl Capability for KnowledgeQuery {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult> {
        let Some(query) = string_arg(&arguments, "query") else {
            return Ok(ExecutionResult::failure(
                AgentError::InvalidArgument {
                    name: "query".into(),
                    reason: "missing".into(),
                }
                .to_string(),
            ));
        };
        let n_results = count_arg(&arguments, "n_results").unwrap_or(DEFAULT_RESULTS) as usize;

        let Some(backend) = &self.backend else {
            return Ok(ExecutionResult::failure(
                AgentError::ConfigurationError(format!(
                    "no knowledge base configured for {}",
                    self.descriptor.name
                ))
                .to_string(),
            ));
        };

        let result = match self.mode {
            QueryMode::Answer => {
                let grounded = backend.answer(query, n_results).await?;
                info!("{} answered from {} chunk(s)", self.descriptor.name, grounded.context.len());
                let sources: Vec<_> = grounded
                    .context
                    .iter()
                    .map(|chunk| json!({"source": chunk.source, "relevance": chunk.relevance}))
                    .collect();
                json!({ "answer": grounded.answer, "sources": sources })
            }
            QueryMode::Search => {
                let chunks = backend.search(query, n_results).await?;
                info!("{} returned {} chunk(s)", self.descriptor.name, chunks.len());
                serde_json::to_value(chunks)?
            }
        };
        Ok(ExecutionResult::success(result))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Fixed {
        requested: Mutex<Vec<usize>>,
    }

    impl Fixed {
        fn chunks(n: usize) -> Vec<KnowledgeChunk> {
            (0..n.min(2))
                .map(|i| KnowledgeChunk {
                    text: format!("chunk {}", i),
                    source: format!("notes_{}.pdf", i),
                    relevance: 0.9 - i as f64 * 0.1,
                })
                .collect()
        }
    }

    #[async_trait]
    impl KnowledgeBase for Fixed {
        async fn search(&self, _query: &str, n_results: usize) -> Result<Vec<KnowledgeChunk>> {
            self.requested.lock().unwrap().push(n_results);
            Ok(Self::chunks(n_results))
        }

        async fn answer(&self, query: &str, n_results: usize) -> Result<GroundedAnswer> {
            self.requested.lock().unwrap().push(n_results);
            Ok(GroundedAnswer {
                answer: format!("About {}", query),
                context: Self::chunks(n_results),
            })
        }
    }

    fn args(query: &str) -> Arguments {
        let mut args = Arguments::new();
        args.insert("query".into(), json!(query));
        args
    }

    #[tokio::test]
    async fn answers_with_sources() {
        let backend = Arc::new(Fixed::default());
        let rag = KnowledgeQuery::new(QueryMode::Answer, Some(backend.clone()));
        assert_eq!(rag.name(), "rag_query");

        let result = rag.execute(args("backpropagation")).await.unwrap();
        assert!(result.success);
        let payload = result.result.unwrap();
        assert_eq!(payload["answer"], "About backpropagation");
        assert_eq!(payload["sources"][0]["source"], "notes_0.pdf");
        assert!(payload["sources"][0].get("text").is_none());
        assert_eq!(*backend.requested.lock().unwrap(), vec![5]);
    }

    #[tokio::test]
    async fn search_returns_chunks_and_honours_n_results() {
        let backend = Arc::new(Fixed::default());
        let search = KnowledgeQuery::new(QueryMode::Search, Some(backend.clone()));
        assert_eq!(search.name(), "knowledge_search");

        let mut arguments = args("gradient descent");
        arguments.insert("n_results".into(), json!("1"));
        let result = search.execute(arguments).await.unwrap();
        assert!(result.success);
        let chunks = result.result.unwrap();
        assert_eq!(chunks.as_array().unwrap().len(), 1);
        assert_eq!(chunks[0]["text"], "chunk 0");
        assert_eq!(*backend.requested.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn missing_backend_is_configuration_failure() {
        let rag = KnowledgeQuery::new(QueryMode::Answer, None);
        let result = rag.execute(args("anything")).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("configuration error"));
    }

    #[tokio::test]
    async fn missing_query_fails() {
        let rag = KnowledgeQuery::new(QueryMode::Search, Some(Arc::new(Fixed::default())));
        let result = rag.execute(Arguments::new()).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("query"));
    }
}
