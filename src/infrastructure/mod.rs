//! Infrastructure layer: adapters for external providers, configuration, and
//! persistence.

pub mod completion;
pub mod config;
pub mod search;
pub mod session;
pub mod setup;

pub use config::{ConfigError, ConfigLoader};
pub use setup::{build_research_stack, ResearchStack};
