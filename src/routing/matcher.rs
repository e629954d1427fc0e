//! Path matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Combine prefixes with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Plain string prefix: `/public` also matches `/publications`
//! - Empty set never matches
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// A set of prefixes, any of which may match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    matchers: Vec<PathPrefixMatcher>,
}

impl PrefixSet {
    pub fn new<I>(prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// The first prefix matching `path`, if any.
    pub fn find(&self, path: &str) -> Option<&str> {
        self.matchers
            .iter()
            .find(|m| m.matches(path))
            .map(PathPrefixMatcher::prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(PathPrefixMatcher::prefix)
    }
}

impl Matcher for PrefixSet {
    fn matches(&self, path: &str) -> bool {
        // Any matcher may pass (OR)
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/dashboard");

        assert!(matcher.matches("/dashboard"));
        assert!(matcher.matches("/dashboard/jobs/7"));
        assert!(!matcher.matches("/Dashboard")); // Case sensitive
        assert!(!matcher.matches("/login"));
    }

    #[test]
    fn test_prefix_is_not_segment_aware() {
        let matcher = PathPrefixMatcher::new("/public");
        assert!(matcher.matches("/publications"));
    }

    #[test]
    fn test_prefix_set() {
        let set = PrefixSet::new(["/login", "/signup"]);

        assert!(set.matches("/signup/recruiter"));
        assert_eq!(set.find("/login?next=/dashboard"), Some("/login"));
        assert_eq!(set.find("/jobs"), None);
        assert_eq!(set.prefixes().collect::<Vec<_>>(), vec!["/login", "/signup"]);
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = PrefixSet::default();
        assert!(set.is_empty());
        assert!(!set.matches("/"));
        assert!(!set.matches(""));
    }
}
