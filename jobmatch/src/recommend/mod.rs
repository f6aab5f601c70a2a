//! Recommendation Parser and the per-session recommend pipeline.

mod export;
mod parser;
mod session;

pub use export::{save_recommendations_csv, write_recommendations_csv};
pub use parser::{parse_recommendation_outcome, parse_recommendations};
pub use session::{JobSession, Recommendation};
