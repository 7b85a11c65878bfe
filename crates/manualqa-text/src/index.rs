use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, TantivyDocument};

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::LexicalIndex;
use manualqa_core::types::{CandidateSource, Chunk, SearchHit};

use crate::tantivy_utils::{build_schema, register_tokenizer};

pub struct LexicalSearchIndex {
    index: Index,
    id_field: tantivy::schema::Field,
    text_field: tantivy::schema::Field,
    page_field: tantivy::schema::Field,
}

impl LexicalSearchIndex {
    /// Creates an empty in-RAM index. Call `index` with the snapshot chunks
    /// before searching.
    pub fn new() -> Result<Self> {
        let schema = build_schema();
        let index = Index::create_in_ram(schema.clone());
        register_tokenizer(&index);
        let id_field = schema.get_field("id").map_err(|e| Error::Index(e.to_string()))?;
        let text_field = schema.get_field("text").map_err(|e| Error::Index(e.to_string()))?;
        let page_field = schema.get_field("page").map_err(|e| Error::Index(e.to_string()))?;
        Ok(Self { index, id_field, text_field, page_field })
    }
}

impl LexicalIndex for LexicalSearchIndex {
    fn index(&self, chunks: &[Chunk]) -> Result<()> {
        let mut index_writer = self
            .index
            .writer(50_000_000)
            .map_err(|e| Error::Index(format!("writer: {e}")))?;
        for c in chunks {
            let doc = doc!(
                self.id_field => c.id.clone(),
                self.text_field => c.text.clone(),
                self.page_field => u64::from(c.page),
            );
            index_writer
                .add_document(doc)
                .map_err(|e| Error::Index(format!("add document: {e}")))?;
        }
        index_writer
            .commit()
            .map_err(|e| Error::Index(format!("commit: {e}")))?;
        Ok(())
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let reader = self.index.reader().map_err(|e| Error::Index(e.to_string()))?;
        let searcher = reader.searcher();
        let qp = QueryParser::for_index(&self.index, vec![self.text_field]);
        // Lenient parsing: questions contain '?' and other operator
        // characters a strict parser would reject.
        let (q, _parse_errors) = qp.parse_query_lenient(query);
        let top_docs = searcher
            .search(&q, &TopDocs::with_limit(k))
            .map_err(|e| Error::Index(format!("search: {e}")))?;
        let mut hits = Vec::new();
        for (score, addr) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(addr)
                .map_err(|e| Error::Index(format!("doc fetch: {e}")))?;
            let id = doc.get_first(self.id_field).and_then(|v| v.as_str()).unwrap_or("").to_string();
            hits.push(SearchHit { id, score, source: CandidateSource::Lexical });
        }
        Ok(hits)
    }
}
