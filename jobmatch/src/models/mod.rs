mod job;
mod recommendation;

pub use job::*;
pub use recommendation::*;
