pub mod classifier;
pub mod collector;
pub mod crossref;
pub mod export;
pub mod pipeline;
pub mod prefilter;
pub mod queries;
pub mod ranker;
pub mod traits;
