//! Job recommendation assistant.
//!
//! Job postings from a CSV file or a job-search provider are normalized into
//! [`models::JobRecord`]s, projected to text, embedded and indexed for
//! nearest-neighbour search. A user profile is used as the query, the nearest
//! postings are handed to a language model, and its loosely structured answer
//! is parsed back into [`models::RecommendationRecord`]s.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod error;
mod http;
pub mod index;
pub mod llm;
pub mod models;
pub mod profile;
pub mod recommend;

pub use error::{JobMatchError, Result};
