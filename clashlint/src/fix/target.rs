/// Picks a replacement for a rule target that names no existing group.
pub trait TargetResolver {
    fn resolve(&self, target: &str, group_names: &[&str]) -> String;
}

const COMMON_ALIASES: [(&str, &str); 6] = [
    ("youtube", "YouTube"),
    ("netflix", "NETFLIX"),
    ("ai", "AI"),
    ("proxy", "Proxy"),
    ("direct", "DIRECT"),
    ("reject", "REJECT"),
];

pub const DEFAULT_FALLBACK_TARGET: &str = "Proxy";

/// Best-effort name matching: case-insensitive equality, then containment in
/// either direction, then a table of common aliases. It is a heuristic; the
/// result is not guaranteed to be a declared group.
pub fn find_similar_group(target: &str, group_names: &[&str]) -> Option<String> {
    let lower = target.to_lowercase();
    if let Some(name) = group_names.iter().find(|n| n.to_lowercase() == lower) {
        return Some(name.to_string());
    }
    if let Some(name) = group_names.iter().find(|n| {
        let n = n.to_lowercase();
        !n.is_empty() && (n.contains(&lower) || lower.contains(&n))
    }) {
        return Some(name.to_string());
    }
    COMMON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, name)| name.to_string())
}

#[derive(Debug, Clone)]
pub struct SimilarityResolver {
    pub fallback: String,
}

impl SimilarityResolver {
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl Default for SimilarityResolver {
    fn default() -> Self {
        Self::with_fallback(DEFAULT_FALLBACK_TARGET)
    }
}

impl TargetResolver for SimilarityResolver {
    fn resolve(&self, target: &str, group_names: &[&str]) -> String {
        find_similar_group(target, group_names).unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity() {
        let names = ["Proxy", "YouTube Music", "Apple"];
        assert_eq!(find_similar_group("proxy", &names).as_deref(), Some("Proxy"));
        assert_eq!(
            find_similar_group("youtube", &names).as_deref(),
            Some("YouTube Music")
        );
        assert_eq!(
            find_similar_group("AppleTV", &names).as_deref(),
            Some("Apple")
        );
        assert_eq!(find_similar_group("Netflix", &names).as_deref(), Some("NETFLIX"));
        assert_eq!(find_similar_group("direct", &[]).as_deref(), Some("DIRECT"));
        assert_eq!(find_similar_group("Telegram", &names), None);

        let resolver = SimilarityResolver::default();
        assert_eq!(resolver.resolve("Telegram", &names), "Proxy");
        let resolver = SimilarityResolver::with_fallback("Final");
        assert_eq!(resolver.resolve("Telegram", &names), "Final");
    }
}
