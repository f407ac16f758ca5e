//! End-to-end pipeline behavior over a small trek-journal corpus, with
//! stub collaborators standing in for the embedding and generation APIs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use ragline_core::corpus::SnippetCorpus;
use ragline_core::embedding::EmbeddingError;
use ragline_core::embedding::EmbeddingProvider;
use ragline_core::generation::ChatGenerator;
use ragline_core::generation::GenerationError;
use ragline_core::pipeline::RagPipeline;
use ragline_core::prompt::ChatMessage;
use ragline_core::prompt::RAG_SYSTEM_INSTRUCTION;
use ragline_core::prompt::Role;
use ragline_core::retrieval::Retriever;

const TREK_CORPUS: [&str; 7] = [
    "Ethan set out at dawn, following the winding trail up the mountain.",
    "The forest was dense, and the path twisted between ancient pines.",
    "Ethan always carried a map and compass, ensuring they never lost their way.",
    "By midday, Ethan reached a clearing with a view of the valley below.",
    "A sudden storm forced Ethan to shelter beneath a rocky overhang.",
    "When the skies cleared, a rainbow arched over the distant peaks.",
    "Ethan returned home at dusk, already planning the next adventure.",
];

const NAVIGATION_QUERY: &str = "What tools did Ethan use to navigate?";
const NAVIGATION_SNIPPET: &str =
    "Ethan always carried a map and compass, ensuring they never lost their way.";

fn one_hot(dimensions: usize, hot: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimensions];
    v[hot] = 1.0;
    v
}

fn trek_corpus() -> SnippetCorpus {
    SnippetCorpus::new(TREK_CORPUS.iter().map(|s| s.to_string()).collect())
}

/// Embeds each corpus snippet as its own axis and maps the navigation
/// query onto the axis of the map-and-compass snippet.
struct TrekEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl TrekEmbedder {
    fn new() -> Self {
        let mut table: HashMap<String, Vec<f32>> = TREK_CORPUS
            .iter()
            .enumerate()
            .map(|(i, text)| (text.to_string(), one_hot(TREK_CORPUS.len(), i)))
            .collect();
        table.insert(
            NAVIGATION_QUERY.to_string(),
            one_hot(TREK_CORPUS.len(), 2),
        );
        Self { table }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrekEmbedder {
    fn model_id(&self) -> String {
        "test:trek".to_string()
    }

    fn dimensions(&self) -> usize {
        TREK_CORPUS.len()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::Provider(format!("unknown text: {text}")))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Replies with a fixed answer and records every prompt it receives.
struct ScriptedGenerator {
    reply: String,
    prompts: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

#[async_trait::async_trait]
impl ChatGenerator for ScriptedGenerator {
    fn model_id(&self) -> String {
        "test:scripted".to_string()
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn navigation_query_grounds_on_the_map_and_compass_snippet() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let generator = ScriptedGenerator {
        reply: "Ethan used a map and compass.".to_string(),
        prompts: Arc::clone(&prompts),
    };

    let pipeline = RagPipeline::build(
        Box::new(TrekEmbedder::new()),
        Box::new(generator),
        trek_corpus(),
    )
    .await
    .unwrap();

    let answer = pipeline.answer(NAVIGATION_QUERY).await.unwrap();

    assert_eq!(answer.text, "Ethan used a map and compass.");
    assert_eq!(answer.context.position, 2);
    assert_eq!(answer.context.text, NAVIGATION_SNIPPET);
    assert_eq!(answer.context.distance, 0.0);
}

#[tokio::test]
async fn generator_receives_the_exact_two_message_prompt() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let generator = ScriptedGenerator {
        reply: "ok".to_string(),
        prompts: Arc::clone(&prompts),
    };

    let pipeline = RagPipeline::build(
        Box::new(TrekEmbedder::new()),
        Box::new(generator),
        trek_corpus(),
    )
    .await
    .unwrap();

    pipeline.answer(NAVIGATION_QUERY).await.unwrap();

    let seen = prompts.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let messages = &seen[0];

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].text(), RAG_SYSTEM_INSTRUCTION);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(
        messages[1].text(),
        format!("Context:\n{NAVIGATION_SNIPPET}\n\nQuestion: {NAVIGATION_QUERY}")
    );
}

#[tokio::test]
async fn every_snippet_retrieves_itself_exactly() {
    let retriever = Retriever::build(Box::new(TrekEmbedder::new()), trek_corpus())
        .await
        .unwrap();

    for (position, text) in TREK_CORPUS.iter().enumerate() {
        let hit = retriever.retrieve(text).await.unwrap();
        assert_eq!(hit.position, position);
        assert_eq!(hit.text, *text);
        assert_eq!(hit.distance, 0.0);
    }
}

#[tokio::test]
async fn retrieval_depth_covers_the_whole_corpus_at_most() {
    let retriever = Retriever::build(Box::new(TrekEmbedder::new()), trek_corpus())
        .await
        .unwrap();

    let hits = retriever.retrieve_k(NAVIGATION_QUERY, 100).await.unwrap();
    assert_eq!(hits.len(), TREK_CORPUS.len());
    assert_eq!(hits[0].position, 2);
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}
