use std::time::Duration;

use manualqa_core::config::Settings;
use manualqa_core::store::JsonChunkStore;
use manualqa_core::traits::{ChunkStore, Retriever};
use manualqa_embed::build_embedder;
use manualqa_generate::{AnswerGenerator, GeminiClient, GeminiConfig};
use manualqa_hybrid::HybridRetriever;
use manualqa_rerank::{build_scorer, Reranker};
use manualqa_text::LexicalSearchIndex;
use manualqa_vector::DenseVectorIndex;
use tracing_subscriber::EnvFilter;

/// Smoke questions with known answers in the manual snapshot.
const CHECK_QUESTIONS: [&str; 3] = [
    "What is the first action after positive rate of climb?",
    "What does the amber STAIRS OPER light indicate?",
    "Where is the ISOLATION VALVE switch set during After Start Procedure?",
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Manual QA Pipeline Check");
    println!("========================");

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let store = JsonChunkStore::new(&settings.persist_dir);
    let chunks = store.get_all_chunks()?;
    println!("📦 Loaded {} chunks from {}", chunks.len(), settings.persist_dir.display());

    let embedder = build_embedder(&settings.embedding_model)?;
    let lexical = LexicalSearchIndex::new()?;
    let vector = DenseVectorIndex::new(embedder.dim());
    let mut retriever = HybridRetriever::new(lexical, vector, embedder)
        .with_fusion(settings.rrf_k, settings.pool_multiplier);
    retriever.index(&chunks)?;
    println!("✅ Indexed {} chunks", chunks.len());

    let reranker = Reranker::new(build_scorer(&settings.reranker_model)?);
    println!("✅ Reranker ready ({})", settings.reranker_model);

    let client = GeminiClient::new(GeminiConfig {
        base_url: settings.generation_base_url.clone(),
        model: settings.generation_model.clone(),
        api_key: settings.generation_api_key.clone(),
        timeout: Duration::from_secs(settings.request_timeout_secs),
        max_retries: settings.max_retries,
        initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
        ..GeminiConfig::default()
    })?;
    let generator = AnswerGenerator::new(Box::new(client), settings.generation_max_tokens);
    println!("✅ Generation client ready ({})\n", settings.generation_model);

    let rt = tokio::runtime::Runtime::new()?;
    for question in CHECK_QUESTIONS {
        println!("{}", "=".repeat(80));
        println!("QUESTION: {}", question);
        println!("{}", "=".repeat(80));

        let candidates = retriever.search(question, settings.hybrid_top_k)?;
        println!("🔍 Retrieved {} candidates", candidates.len());

        let reranked = reranker.rerank(question, &candidates, settings.rerank_top_k)?;
        println!("📊 Reranked to {} candidates", reranked.len());

        let answer = rt.block_on(generator.generate(question, &reranked, settings.generate_chunks))?;
        println!("\nANSWER:\n{}", answer.text);
        if answer.cited_pages.is_empty() {
            println!("\nPAGES: (none)\n");
        } else {
            let pages: Vec<String> = answer.cited_pages.iter().map(u32::to_string).collect();
            println!("\nPAGES: {}\n", pages.join(", "));
        }
    }

    println!("✅ Pipeline check complete");
    Ok(())
}
