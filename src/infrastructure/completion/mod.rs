//! Text-completion adapter.

pub mod error;
pub mod groq;
pub mod rate_limiter;
pub mod retry;

pub use error::CompletionApiError;
pub use groq::GroqCompletionClient;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
