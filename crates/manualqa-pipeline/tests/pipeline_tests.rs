use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::{Embedder, GenerationClient, Retriever};
use manualqa_core::types::{Chunk, GeneratedAnswer, ScoredCandidate};
use manualqa_embed::HashEmbedder;
use manualqa_generate::AnswerGenerator;
use manualqa_hybrid::HybridRetriever;
use manualqa_pipeline::{Pipeline, PipelineBudgets};
use manualqa_rerank::{OverlapScorer, Reranker};
use manualqa_text::LexicalSearchIndex;
use manualqa_vector::DenseVectorIndex;

fn manual_chunks() -> Vec<Chunk> {
    let rows = [
        ("c1", "After takeoff, at positive rate of climb, call GEAR UP and retract the landing gear.", 42),
        ("c2", "The amber STAIRS OPER light indicates the airstair is in motion or not fully locked.", 12),
        ("c3", "During the After Start Procedure, set the ISOLATION VALVE switch to AUTO.", 57),
        ("c4", "Set flaps to the takeoff position and check the trim is in the green band.", 40),
        ("c5", "Cabin pressurization outflow valve operation is automatic in normal flight.", 61),
    ];
    rows.iter()
        .map(|(id, text, page)| Chunk {
            id: (*id).to_string(),
            text: (*text).to_string(),
            page: *page,
            metadata: Default::default(),
        })
        .collect()
}

struct RecordingClient {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl RecordingClient {
    fn new(reply: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        (Self { reply: reply.to_string(), prompts: prompts.clone() }, prompts)
    }
}

#[async_trait]
impl GenerationClient for RecordingClient {
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn offline_pipeline(chunks: &[Chunk], reply: &str, budgets: PipelineBudgets) -> (Pipeline, Arc<Mutex<Vec<String>>>) {
    let embedder = Box::new(HashEmbedder::new(1024));
    let lexical = LexicalSearchIndex::new().expect("lexical index");
    let vector = DenseVectorIndex::new(embedder.dim());
    let mut retriever = HybridRetriever::new(lexical, vector, embedder);
    retriever.index(chunks).expect("index chunks");

    let (client, prompts) = RecordingClient::new(reply);
    let pipeline = Pipeline::new(
        Box::new(retriever),
        Reranker::new(Box::new(OverlapScorer)),
        AnswerGenerator::new(Box::new(client), 512),
        budgets,
    );
    (pipeline, prompts)
}

#[tokio::test]
async fn positive_rate_question_cites_page_42() {
    let (pipeline, prompts) = offline_pipeline(
        &manual_chunks(),
        "Call GEAR UP and retract the landing gear.\nPAGES: 42",
        PipelineBudgets::default(),
    );

    let answer = pipeline
        .answer("What is the first action after positive rate of climb?")
        .await
        .expect("answer");

    assert_eq!(answer.cited_pages, BTreeSet::from([42]));
    assert_eq!(answer.text, "Call GEAR UP and retract the landing gear.");

    // the positive-rate chunk must lead the generation context
    let seen = prompts.lock().expect("lock");
    let first_tag = seen[0].find("[Page 42]").expect("page 42 tag");
    for other in ["[Page 12]", "[Page 57]", "[Page 40]", "[Page 61]"] {
        if let Some(pos) = seen[0].find(other) {
            assert!(first_tag < pos, "{other} ranked above the positive-rate chunk");
        }
    }
}

#[tokio::test]
async fn generation_context_respects_the_budget() {
    let budgets = PipelineBudgets { retrieve_k: 5, rerank_k: 3, generate_k: 2 };
    let (pipeline, prompts) = offline_pipeline(&manual_chunks(), "Answer.\nPAGES: 57", budgets);

    pipeline.answer("Where is the ISOLATION VALVE switch set?").await.expect("answer");

    let seen = prompts.lock().expect("lock");
    let tags = seen[0].matches("[Page ").count();
    assert!(tags <= 2, "expected at most 2 context chunks, saw {tags}");
}

#[tokio::test]
async fn hallucinated_pages_never_reach_the_caller() {
    let (pipeline, _) = offline_pipeline(
        &manual_chunks(),
        "Probably this.\nPAGES: 42, 999",
        PipelineBudgets::default(),
    );

    let answer = pipeline.answer("positive rate of climb").await.expect("answer");
    assert!(!answer.cited_pages.contains(&999));
}

#[tokio::test]
async fn empty_store_surfaces_empty_context() {
    let (pipeline, _) = offline_pipeline(&[], "unused", PipelineBudgets::default());
    let err = pipeline.answer("any question").await.expect_err("no context");
    assert!(matches!(err, Error::EmptyContext));
}

#[tokio::test]
async fn invalid_query_is_rejected_up_front() {
    let (pipeline, prompts) = offline_pipeline(&manual_chunks(), "unused", PipelineBudgets::default());
    let err = pipeline.answer("   ").await.expect_err("blank query");
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(prompts.lock().expect("lock").is_empty(), "generation must not run");
}

#[tokio::test]
async fn pre_generation_stages_are_deterministic() {
    let (pipeline, prompts) = offline_pipeline(
        &manual_chunks(),
        "Answer.\nPAGES: 57",
        PipelineBudgets::default(),
    );
    pipeline.answer("isolation valve switch").await.expect("first");
    pipeline.answer("isolation valve switch").await.expect("second");
    let seen = prompts.lock().expect("lock");
    assert_eq!(seen[0], seen[1], "same query must build the same prompt");
}

struct BrokenRetriever;

impl Retriever for BrokenRetriever {
    fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<ScoredCandidate>> {
        Err(Error::Index("segment reader failed".to_string()))
    }
}

struct PanickyClient;

#[async_trait]
impl GenerationClient for PanickyClient {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        panic!("generation must not be reached when retrieval fails");
    }
}

#[tokio::test]
async fn stage_failure_aborts_the_query() {
    let pipeline = Pipeline::new(
        Box::new(BrokenRetriever),
        Reranker::new(Box::new(OverlapScorer)),
        AnswerGenerator::new(Box::new(PanickyClient), 512),
        PipelineBudgets::default(),
    );
    let err = pipeline.answer("anything").await.expect_err("retrieval failure");
    assert!(matches!(err, Error::Index(_)));
}

#[tokio::test]
async fn answer_type_round_trips_pages_in_order() {
    let answer = GeneratedAnswer {
        text: "ok".to_string(),
        cited_pages: BTreeSet::from([57, 42, 61]),
    };
    let pages: Vec<u32> = answer.cited_pages.iter().copied().collect();
    assert_eq!(pages, vec![42, 57, 61]);
}
