//! Prompt templates for every loop stage.
//!
//! Role-conditioned variants are selected by exhaustive match so a new role
//! cannot silently fall through to a default template.

use crate::domain::models::Role;

/// Rewrite the raw user query into a focused legal search query.
///
/// The template demands JSON with a single `rewritten_query` field; callers
/// fall back to the raw generated text when that contract is not honored.
pub fn rewrite(role: Role, query: &str) -> String {
    match role {
        Role::Citizen => format!(
            "You are a legal research assistant specializing in Indian law.\n\
             Rewrite the user's query into a precise, legally-focused search query.\n\n\
             Output MUST be JSON in this format:\n\
             {{ \"rewritten_query\": \"<your query here>\" }}\n\n\
             Original Query: {query}\n\
             JSON Output:"
        ),
        Role::Lawyer => format!(
            "You are a specialized legal research assistant for lawyers.\n\
             Rewrite the user's case details into a precise search query for legal \
             precedents, relevant acts, and strong arguments. Focus on key entities \
             such as legal acts, case names, and specific arguments (e.g. \"defense \
             for X offense\", \"arguments against X\").\n\n\
             Output MUST be JSON in this format:\n\
             {{ \"rewritten_query\": \"<your query here>\" }}\n\n\
             Original Case Details: {query}\n\
             JSON Output:"
        ),
    }
}

/// Summarize trimmed evidence text in one pass, <= ~200 words.
pub fn digest_trim(label: &str, query: &str, text: &str) -> String {
    format!(
        "Summarize the following {label} (<200 words), focusing on acts, \
         sections, and judgments.\n\n\
         Query: {query}\n\
         Text: {text}\n\n\
         Summary:"
    )
}

/// Summarize one chunk of evidence text, <= ~120 words.
pub fn digest_chunk(label: &str, query: &str, chunk: &str) -> String {
    format!(
        "Summarize this {label} chunk (<120 words), focusing only on acts, \
         sections, and judgments.\n\n\
         Query: {query}\n\
         {label} chunk: {chunk}\n\n\
         Summary:"
    )
}

/// Merge per-chunk summaries into one digest, <= ~250 words.
pub fn digest_merge(label: &str, query: &str, summaries: &str) -> String {
    format!(
        "Combine the following {label} summaries into one concise digest \
         (<250 words):\n\n\
         Query: {query}\n\
         Summaries:\n{summaries}\n\n\
         Final Digest:"
    )
}

/// Cross-source reflection with an explicit completeness verdict.
pub fn reflection(query: &str, corpus_digest: &str, web_digest: &str) -> String {
    format!(
        "Based on the original query and the following summarized search \
         results, provide a concise reflection.\n\n\
         Original Query: {query}\n\
         Corpus Summary: {corpus_digest}\n\
         Web Summary: {web_digest}\n\n\
         Reflection:\n\
         1. Key findings:\n\
         2. Knowledge Gaps:\n\
         3. Research complete? ('YES' or 'NO')"
    )
}

/// Render the structured final analysis from the accumulated research steps.
pub fn final_analysis(role: Role, query: &str, steps: &str) -> String {
    let audience = match role {
        Role::Citizen => {
            "generate a structured legal analysis in plain language a non-lawyer can act on:"
        }
        Role::Lawyer => {
            "generate a structured legal analysis emphasizing precedents, statutory \
             hooks, and arguments usable in court:"
        }
    };

    format!(
        "Based on the user query and research steps, {audience}\n\n\
         - **Original Query**\n\
         - **Legal Context**\n\
         - **Case Law Summary**\n\
         - **Analysis and Recommendations**\n\
         - **Sources**\n\n\
         Query: {query}\n\
         Research Steps: {steps}\n\n\
         Final Analysis:"
    )
}
