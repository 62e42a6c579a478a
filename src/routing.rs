//! Domain Routing
//!
//! Decides, from the request hostname and path, whether a request is served
//! as-is or bounced to the dashboard subdomain. The decision is a pure
//! function; [`domain_routing`] applies it as axum middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::collections::HashSet;
use std::sync::Arc;

/// Path the dashboard host's root is sent to
pub const DASHBOARD_ROOT: &str = "/dashboard";

/// What to do with an incoming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostDecision {
    /// Serve the request unmodified
    ServeAsIs,
    /// Absolute redirect to the same path on the dashboard host
    RedirectToDashboardHost(String),
    /// Relative redirect to the dashboard root on the current host
    RedirectToDashboardRoot,
}

impl HostDecision {
    /// Redirect target, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            HostDecision::ServeAsIs => None,
            HostDecision::RedirectToDashboardHost(url) => Some(url),
            HostDecision::RedirectToDashboardRoot => Some(DASHBOARD_ROOT),
        }
    }
}

/// Known hostnames and the paths that belong to the dashboard app
#[derive(Debug, Clone)]
pub struct HostRules {
    marketing_hosts: HashSet<String>,
    dashboard_host: String,
    app_prefixes: Vec<String>,
}

impl Default for HostRules {
    fn default() -> Self {
        Self::new(
            ["spacevoice.ai", "www.spacevoice.ai"].map(String::from),
            "dashboard.spacevoice.ai",
            ["/dashboard", "/login", "/register", "/onboarding"].map(String::from),
        )
    }
}

impl HostRules {
    pub fn new(
        marketing_hosts: impl IntoIterator<Item = String>,
        dashboard_host: &str,
        app_prefixes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            marketing_hosts: marketing_hosts
                .into_iter()
                .map(|h| normalize_host(&h))
                .collect(),
            dashboard_host: normalize_host(dashboard_host),
            app_prefixes: app_prefixes
                .into_iter()
                .map(|p| p.trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Decide how to handle `hostname` + `path_and_query`.
    ///
    /// Unrecognized hostnames (previews, localhost, raw IPs) always fall
    /// through unmodified.
    pub fn route(&self, hostname: &str, path_and_query: &str) -> HostDecision {
        let host = normalize_host(hostname);
        let path = path_only(path_and_query);

        if self.marketing_hosts.contains(&host) {
            if self.app_prefixes.iter().any(|prefix| has_prefix(path, prefix)) {
                let target = if path_and_query.starts_with('/') {
                    path_and_query.to_string()
                } else {
                    format!("/{}", path_and_query)
                };
                return HostDecision::RedirectToDashboardHost(format!(
                    "https://{}{}",
                    self.dashboard_host, target
                ));
            }
            return HostDecision::ServeAsIs;
        }

        if host == self.dashboard_host && (path.is_empty() || path == "/") {
            return HostDecision::RedirectToDashboardRoot;
        }

        HostDecision::ServeAsIs
    }
}

/// [`HostRules::route`] under the production domain layout
pub fn route_host(hostname: &str, path_and_query: &str) -> HostDecision {
    HostRules::default().route(hostname, path_and_query)
}

/// Strip the port (including the bracketed IPv6 form), any trailing dot,
/// and lowercase.
pub fn normalize_host(hostname: &str) -> String {
    let trimmed = hostname.trim();

    let without_port = if let Some(rest) = trimmed.strip_prefix('[') {
        match rest.split_once(']') {
            Some((addr, _)) => addr,
            None => rest,
        }
    } else if trimmed.matches(':').count() == 1 {
        trimmed.split(':').next().unwrap_or(trimmed)
    } else {
        trimmed
    };

    without_port.trim_end_matches('.').to_ascii_lowercase()
}

/// Path component of a path-and-query string
pub(crate) fn path_only(path_and_query: &str) -> &str {
    let end = path_and_query
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(path_and_query.len());
    &path_and_query[..end]
}

/// Segment-aware prefix match: `/dashboard` matches `/dashboard` and
/// `/dashboard/x` but not `/dashboards`.
pub(crate) fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Axum middleware applying [`HostRules::route`] to every request
pub async fn domain_routing(
    State(rules): State<Arc<HostRules>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request_host(&request);
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let decision = match host.as_deref() {
        Some(h) => rules.route(h, path_and_query),
        None => HostDecision::ServeAsIs,
    };

    match decision.location() {
        None => next.run(request).await,
        Some(location) => {
            tracing::debug!(host = host.as_deref().unwrap_or(""), location, "Domain redirect");
            Redirect::temporary(location).into_response()
        }
    }
}

fn request_host(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
}
