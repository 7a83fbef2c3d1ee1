//! Provider Router.
//!
//! Pure, order-sensitive heuristic over the message text alone.

use nexus_core::provider::{Backend, ProviderSelection};

/// Freshness / search intent.
pub const SEARCH_KEYWORDS: [&str; 4] = ["search", "news", "current", "latest"];
/// Code / analysis intent.
pub const REASONING_KEYWORDS: [&str; 2] = ["code", "analyze"];
/// Messages longer than this many characters go to the reasoning backend.
pub const LONG_MESSAGE_CHARS: usize = 1000;

/// Picks a backend for an unpinned message.
///
/// 1. search keywords → search backend
/// 2. long message or code/analysis keywords → reasoning backend
/// 3. otherwise → default backend
pub fn select_provider(message: &str) -> Backend {
    let lower = message.to_lowercase();

    if SEARCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Backend::SEARCH;
    }

    if message.chars().count() > LONG_MESSAGE_CHARS
        || REASONING_KEYWORDS.iter().any(|k| lower.contains(k))
    {
        return Backend::REASONING;
    }

    Backend::DEFAULT
}

/// Honours a pinned backend, otherwise consults [`select_provider`].
pub fn route(selection: ProviderSelection, message: &str) -> Backend {
    match selection {
        ProviderSelection::Pinned(backend) => backend,
        ProviderSelection::Auto => select_provider(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_keywords_any_case() {
        for message in [
            "Search for flights to Lisbon",
            "any NEWS on the merger?",
            "what's the current rate",
            "Latest figures please",
            "researching options",
        ] {
            assert_eq!(select_provider(message), Backend::Perplexity, "{message}");
        }
    }

    #[test]
    fn test_search_beats_reasoning() {
        assert_eq!(
            select_provider("analyze the latest code changes"),
            Backend::Perplexity
        );
        let long_search = format!("{} news", "x".repeat(2000));
        assert_eq!(select_provider(&long_search), Backend::Perplexity);
    }

    #[test]
    fn test_reasoning_by_keyword() {
        assert_eq!(select_provider("Review this CODE"), Backend::Anthropic);
        assert_eq!(select_provider("please analyze Q3"), Backend::Anthropic);
    }

    #[test]
    fn test_reasoning_by_length_boundary() {
        assert_eq!(select_provider(&"a".repeat(1000)), Backend::Gemini);
        assert_eq!(select_provider(&"a".repeat(1001)), Backend::Anthropic);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 600 chars, 1200 bytes
        assert_eq!(select_provider(&"é".repeat(600)), Backend::Gemini);
    }

    #[test]
    fn test_default_backend() {
        assert_eq!(
            select_provider("schedule a meeting tomorrow"),
            Backend::Gemini
        );
        assert_eq!(select_provider(""), Backend::Gemini);
    }

    #[test]
    fn test_pinned_selection_bypasses_router() {
        assert_eq!(
            route(ProviderSelection::Pinned(Backend::OpenAI), "latest news"),
            Backend::OpenAI
        );
        assert_eq!(
            route(ProviderSelection::Auto, "latest news"),
            Backend::Perplexity
        );
    }
}
