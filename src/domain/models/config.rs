use serde::{Deserialize, Serialize};

/// Main configuration structure for Lara.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Text-completion provider configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Web search provider configuration
    #[serde(default)]
    pub web_search: WebSearchConfig,

    /// Indexed-corpus search configuration
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Evidence digesting configuration
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Loop controller configuration
    #[serde(default)]
    pub research_loop: LoopConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text-completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletionConfig {
    /// API key (can also be set via GROQ_API_KEY env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Sampling temperature; kept low for deterministic-ish research output
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL for the API (for testing/proxies)
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,

    /// Sustained request rate for the token bucket
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Retry policy for transient API errors
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_completion_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

const fn default_max_tokens() -> u32 {
    1024
}

fn default_completion_base_url() -> String {
    "https://api.groq.com/openai".to_string()
}

const fn default_completion_timeout() -> u64 {
    120
}

fn default_requests_per_second() -> f64 {
    2.0
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_completion_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: default_completion_base_url(),
            timeout_secs: default_completion_timeout(),
            requests_per_second: default_requests_per_second(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Web search provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WebSearchConfig {
    /// API key (can also be set via TAVILY_API_KEY env var).
    /// Absence is a startup-time fatal error, not a per-call error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for the API (for testing/proxies)
    #[serde(default = "default_web_search_base_url")]
    pub base_url: String,

    /// Result cap per query
    #[serde(default = "default_web_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "default_web_search_timeout")]
    pub timeout_secs: u64,
}

fn default_web_search_base_url() -> String {
    "https://api.tavily.com".to_string()
}

const fn default_web_max_results() -> usize {
    5
}

const fn default_web_search_timeout() -> u64 {
    30
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_web_search_base_url(),
            max_results: default_web_max_results(),
            timeout_secs: default_web_search_timeout(),
        }
    }
}

/// Indexed-corpus search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CorpusConfig {
    /// Path to the pre-built chunk index (produced by the ingestion pipeline)
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Result cap per query
    #[serde(default = "default_corpus_top_k")]
    pub top_k: usize,
}

fn default_index_path() -> String {
    ".lara/index.json".to_string()
}

const fn default_corpus_top_k() -> usize {
    5
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            top_k: default_corpus_top_k(),
        }
    }
}

/// Strategy for digesting raw evidence text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestStrategy {
    /// Truncate to the leading words and summarize in one call. Faster.
    #[default]
    Trim,

    /// Summarize fixed-size word chunks independently, then merge. More
    /// complete, more completion calls.
    Chunk,
}

/// Evidence digesting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummarizerConfig {
    /// Digest strategy selector
    #[serde(default)]
    pub strategy: DigestStrategy,

    /// Word cap for the trim strategy
    #[serde(default = "default_trim_word_cap")]
    pub trim_word_cap: usize,

    /// Words per chunk for the chunk strategy
    #[serde(default = "default_chunk_size_words")]
    pub chunk_size_words: usize,

    /// Maximum number of chunks processed per digest
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,

    /// Word count above which the trace is compressed before final synthesis
    #[serde(default = "default_trace_compression_threshold")]
    pub trace_compression_threshold_words: usize,
}

const fn default_trim_word_cap() -> usize {
    2_000
}

const fn default_chunk_size_words() -> usize {
    1_200
}

const fn default_max_chunks() -> usize {
    3
}

const fn default_trace_compression_threshold() -> usize {
    1_500
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            strategy: DigestStrategy::default(),
            trim_word_cap: default_trim_word_cap(),
            chunk_size_words: default_chunk_size_words(),
            max_chunks: default_max_chunks(),
            trace_compression_threshold_words: default_trace_compression_threshold(),
        }
    }
}

/// Loop controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoopConfig {
    /// Hard cap on research iterations per turn. Exceeding it forces the
    /// finalize stage with whatever evidence has been gathered.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

const fn default_max_iterations() -> u32 {
    5
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
