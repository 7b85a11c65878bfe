use std::collections::BTreeSet;

use tracing::{debug, warn};

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::GenerationClient;
use manualqa_core::types::{GeneratedAnswer, ScoredCandidate};

/// Token the model is instructed to reply with when the context does not
/// contain the answer.
pub const NOT_IN_MANUAL: &str = "NOT_IN_MANUAL";
/// User-facing text returned for that reply.
pub const NOT_IN_MANUAL_ANSWER: &str = "The manual does not contain this information.";

/// Builds a bounded, page-tagged context from the ranked candidates,
/// prompts the generation client, and post-filters the claimed pages
/// against the pages that were actually supplied.
pub struct AnswerGenerator {
    client: Box<dyn GenerationClient>,
    max_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(client: Box<dyn GenerationClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    pub async fn generate(
        &self,
        query: &str,
        candidates: &[ScoredCandidate],
        max_chunks: usize,
    ) -> Result<GeneratedAnswer> {
        if max_chunks == 0 {
            return Err(Error::InvalidArgument("max_chunks must be at least 1".to_string()));
        }
        if candidates.is_empty() {
            return Err(Error::EmptyContext);
        }

        let context = &candidates[..max_chunks.min(candidates.len())];
        let context_pages: BTreeSet<u32> = context.iter().map(|c| c.chunk.page).collect();
        let prompt = build_prompt(query, context);
        debug!(chunks = context.len(), "requesting grounded answer");

        let reply = self.client.complete(&prompt, self.max_tokens).await?;
        let parsed = parse_reply(&reply);

        if parsed.answer == NOT_IN_MANUAL {
            return Ok(GeneratedAnswer {
                text: NOT_IN_MANUAL_ANSWER.to_string(),
                cited_pages: BTreeSet::new(),
            });
        }

        let mut cited_pages = BTreeSet::new();
        for page in parsed.pages {
            if context_pages.contains(&page) {
                cited_pages.insert(page);
            } else {
                warn!(page, "claimed page was not in the supplied context, dropping");
            }
        }

        Ok(GeneratedAnswer { text: parsed.answer, cited_pages })
    }
}

fn build_prompt(query: &str, context: &[ScoredCandidate]) -> String {
    let mut prompt = String::new();
    prompt.push_str("You answer questions about an aircraft operations manual.\n");
    prompt.push_str("Use ONLY the context below. Do not use outside knowledge.\n\n");
    prompt.push_str("Context:\n");
    for c in context {
        prompt.push_str(&format!("[Page {}]\n{}\n\n", c.chunk.page, c.chunk.text));
    }
    prompt.push_str(&format!("Question: {}\n\n", query));
    prompt.push_str("Rules:\n");
    prompt.push_str(&format!(
        "- If the context does not contain the answer, reply with exactly {}.\n",
        NOT_IN_MANUAL
    ));
    prompt.push_str("- Otherwise answer concisely, then end with one final line of the form:\n");
    prompt.push_str("  PAGES: 42, 57\n");
    prompt.push_str("  listing only pages from the context that support the answer.\n");
    prompt
}

struct ParsedReply {
    answer: String,
    pages: Vec<u32>,
}

/// Splits the reply into answer text and the pages claimed on `PAGES:`
/// lines. Unparseable page tokens are skipped.
fn parse_reply(reply: &str) -> ParsedReply {
    let mut answer_lines: Vec<&str> = Vec::new();
    let mut pages: Vec<u32> = Vec::new();
    for line in reply.trim().lines() {
        if let Some(rest) = line.trim().strip_prefix("PAGES:") {
            for token in rest.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                match token.parse::<u32>() {
                    Ok(page) => pages.push(page),
                    Err(_) => warn!(token, "unparseable page token in citation line"),
                }
            }
        } else {
            answer_lines.push(line);
        }
    }
    ParsedReply { answer: answer_lines.join("\n").trim().to_string(), pages }
}
