#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use jobmatch::embeddings::Embedder;
use jobmatch::error::Result;

pub const DIMENSIONS: usize = 64;

/// Deterministic bag-of-words embedder: every lowercase token is hashed into
/// one of [`DIMENSIONS`] buckets. Texts sharing words land close together.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub document_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn vectorize(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            vector[bucket(&token.to_lowercase())] += 1.0;
        }
        vector
    }
}

fn bucket(token: &str) -> usize {
    // FNV-1a
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMENSIONS as u64) as usize
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|text| Self::vectorize(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    fn model_name(&self) -> &str {
        "keyword-hash"
    }
}

pub const JOBS_CSV: &str = "\
Title, Company ,Description,LINK,location,type,skills,salary
Data Analyst,ABC Corp,Dashboards and reporting with SQL and Tableau,https://abc.example/analyst,Bangalore,Full-time,SQL; Tableau,
Rust Engineer,Ferrous Systems,Build async network services in Rust,https://ferrous.example/rust,Remote,Contract,Rust; Tokio,120k
Pastry Chef,Le Fournil,Bake croissants and bread every morning,https://fournil.example/chef,Paris,Full-time,,
";

/// Write [`JOBS_CSV`] (or `contents`) to `jobs.csv` inside `dir`.
pub fn write_jobs_csv(dir: &Path, contents: Option<&str>) -> PathBuf {
    let path = dir.join("jobs.csv");
    fs::write(&path, contents.unwrap_or(JOBS_CSV)).expect("Failed to write jobs CSV");
    path
}

/// OpenAI chat-completion response body carrying `content`.
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}
