//! Which paths the gate runs for.
//!
//! API routes and static assets are never gated. API handlers answer 401
//! themselves; assets must load on the login page.

use crate::routing::matcher::{Matcher, PrefixSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateScope {
    bypass: PrefixSet,
}

impl GateScope {
    pub fn new<I>(bypass_prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            bypass: PrefixSet::new(bypass_prefixes),
        }
    }

    pub fn applies_to(&self, path: &str) -> bool {
        !self.bypass.matches(path)
    }
}

impl Default for GateScope {
    fn default() -> Self {
        Self::new(["/api", "/_next/static", "/_next/image", "/favicon.ico"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope() {
        let scope = GateScope::default();

        assert!(!scope.applies_to("/api/jobs"));
        assert!(!scope.applies_to("/_next/static/chunks/app.js"));
        assert!(!scope.applies_to("/_next/image?url=x"));
        assert!(!scope.applies_to("/favicon.ico"));

        assert!(scope.applies_to("/"));
        assert!(scope.applies_to("/dashboard"));
        assert!(scope.applies_to("/_next/data/build/page.json"));
    }

    #[test]
    fn test_empty_scope_gates_everything() {
        let scope = GateScope::new(Vec::<String>::new());
        assert!(scope.applies_to("/api/jobs"));
    }
}
