//! Route classification and the gating decision.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::config::{GateConfig, GatePolicy};
use crate::gate::scope::GateScope;
use crate::routing::matcher::{Matcher, PrefixSet};
use crate::session::SessionReader;

/// Which prefix set a path falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Public,
    Auth,
    Protected,
    /// Matched by none of the configured prefix sets.
    Unclassified,
}

/// Outcome of evaluating the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GateDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::RedirectToLogin => "redirect_to_login",
            GateDecision::RedirectToDashboard => "redirect_to_dashboard",
        }
    }
}

/// Mapping from route category to its path prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    pub public: PrefixSet,
    pub auth: PrefixSet,
    pub protected: PrefixSet,
}

impl RouteTable {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            public: PrefixSet::new(config.public_prefixes.iter()),
            auth: PrefixSet::new(config.auth_prefixes.iter()),
            protected: PrefixSet::new(config.protected_prefixes.iter()),
        }
    }

    /// Classify a path. Checked in fixed priority: public, auth, protected.
    pub fn classify(&self, path: &str) -> RouteCategory {
        if self.public.matches(path) {
            RouteCategory::Public
        } else if self.auth.matches(path) {
            RouteCategory::Auth
        } else if self.protected.matches(path) {
            RouteCategory::Protected
        } else {
            RouteCategory::Unclassified
        }
    }
}

/// Stateless per-request session gate.
///
/// Decides from the path and token presence alone whether a page request
/// goes through or is redirected. It never decodes or touches the token.
#[derive(Debug, Clone)]
pub struct SessionGate {
    routes: RouteTable,
    policy: GatePolicy,
    scope: GateScope,
    login_path: String,
    dashboard_path: String,
}

impl SessionGate {
    pub fn new(
        routes: RouteTable,
        policy: GatePolicy,
        login_path: impl Into<String>,
        dashboard_path: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            policy,
            scope: GateScope::default(),
            login_path: login_path.into(),
            dashboard_path: dashboard_path.into(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            RouteTable::from_config(config),
            config.policy,
            config.login_path.clone(),
            config.dashboard_path.clone(),
        )
        .with_scope(GateScope::new(config.bypass_prefixes.iter()))
    }

    pub fn with_scope(mut self, scope: GateScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Whether the gate runs for this path at all.
    pub fn applies_to(&self, path: &str) -> bool {
        self.scope.applies_to(path)
    }

    /// Decide for a path given whether a session token is present.
    pub fn evaluate(&self, path: &str, token_present: bool) -> GateDecision {
        if self.policy == GatePolicy::PublicCarveOut && self.routes.public.matches(path) {
            return GateDecision::Allow;
        }

        if token_present && self.routes.auth.matches(path) {
            return GateDecision::RedirectToDashboard;
        }

        if !token_present && self.routes.protected.matches(path) {
            return GateDecision::RedirectToLogin;
        }

        GateDecision::Allow
    }

    /// Decide for an inbound request, asking `sessions` only for presence.
    pub fn check(&self, path: &str, sessions: &dyn SessionReader, headers: &HeaderMap) -> GateDecision {
        self.evaluate(path, sessions.is_present(headers))
    }

    /// Location to redirect to, or `None` when the request goes through.
    pub fn redirect_target(&self, decision: GateDecision) -> Option<&str> {
        match decision {
            GateDecision::Allow => None,
            GateDecision::RedirectToLogin => Some(&self.login_path),
            GateDecision::RedirectToDashboard => Some(&self.dashboard_path),
        }
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}
