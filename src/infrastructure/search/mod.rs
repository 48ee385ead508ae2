//! Evidence provider adapters.

pub mod local_index;
pub mod tavily;

pub use local_index::LocalIndexSearch;
pub use tavily::TavilyWebSearch;
