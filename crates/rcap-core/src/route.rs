//! Application route table.
//!
//! Routes are matched segment by segment; `:name` segments capture a
//! parameter. When several routes match, the one with the most literal
//! segments wins, so `/activities/create` beats `/activities/:id`.

use crate::user::Role;
use std::collections::BTreeMap;

pub const HOME: &str = "home";
pub const LOGIN: &str = "auth-login";
pub const NOT_FOUND: &str = "not-found";

const AUTH_PREFIX: &str = "auth";

/// Access requirements attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Empty means any role.
    pub requires_roles: Vec<Role>,
    /// Pages only meant for signed-out users (login, register, ...).
    pub guest_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub pattern: String,
    pub meta: RouteMeta,
}

/// A concrete navigation target matched against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: Route,
    /// Path including any query string, as requested.
    pub full_path: String,
    pub params: BTreeMap<String, String>,
}

impl ResolvedRoute {
    pub fn name(&self) -> &str {
        &self.route.name
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.route.meta
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the pattern registered under `name`.
    pub fn path_for(&self, name: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| route.name == name)
            .map(|route| route.pattern.as_str())
    }

    /// Matches `full_path` against the table; unknown paths resolve to `not-found`.
    ///
    /// Anything under `/auth` is guest-only, listed or not.
    pub fn resolve(&self, full_path: &str) -> ResolvedRoute {
        let path = full_path.split(['?', '#']).next().unwrap_or_default();
        let segments = split_segments(path);

        let best = self
            .routes
            .iter()
            .filter_map(|route| {
                match_pattern(&route.pattern, &segments).map(|(literals, params)| (route, literals, params))
            })
            .max_by_key(|(_, literals, _)| *literals);

        let mut resolved = match best {
            Some((route, _, params)) => ResolvedRoute {
                route: route.clone(),
                full_path: full_path.to_string(),
                params,
            },
            None => ResolvedRoute {
                route: Route {
                    name: NOT_FOUND.to_string(),
                    pattern: "/:catchAll(.*)*".to_string(),
                    meta: RouteMeta::default(),
                },
                full_path: full_path.to_string(),
                params: BTreeMap::new(),
            },
        };

        if segments.first() == Some(&AUTH_PREFIX) {
            resolved.route.meta.guest_only = true;
        }
        resolved
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Returns the number of literal segments matched plus captured params.
fn match_pattern(pattern: &str, segments: &[&str]) -> Option<(usize, BTreeMap<String, String>)> {
    let parts = split_segments(pattern);
    if parts.len() != segments.len() {
        return None;
    }

    let mut literals = 0;
    let mut params = BTreeMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        if let Some(name) = part.strip_prefix(':') {
            params.insert(name.to_string(), segment.to_string());
        } else if part == segment {
            literals += 1;
        } else {
            return None;
        }
    }
    Some((literals, params))
}

fn route(name: &str, pattern: &str, meta: RouteMeta) -> Route {
    Route {
        name: name.to_string(),
        pattern: pattern.to_string(),
        meta,
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let open = RouteMeta::default;
        let guest = || RouteMeta {
            guest_only: true,
            ..RouteMeta::default()
        };
        let authed = || RouteMeta {
            requires_auth: true,
            ..RouteMeta::default()
        };
        let admin = || RouteMeta {
            requires_auth: true,
            requires_roles: vec![Role::SuperAdmin, Role::Admin],
            guest_only: false,
        };

        Self::new(vec![
            route(HOME, "/", open()),
            route(LOGIN, "/auth/login", guest()),
            route("auth-register", "/auth/register", guest()),
            route("auth-forgot-password", "/auth/forgot-password", guest()),
            route("auth-reset-password", "/auth/reset-password", guest()),
            route("user-profile", "/profile", authed()),
            route("activities-list", "/activities", authed()),
            route("activities-create", "/activities/create", authed()),
            route("activities-detail", "/activities/:id", authed()),
            route("activities-timeline", "/activities/timeline", authed()),
            route("dashboard", "/dashboard", authed()),
            route("organisations-list", "/organisations", admin()),
            route("organisations-create", "/organisations/create", admin()),
            route("organisations-detail", "/organisations/:id", admin()),
            route("messages-inbox", "/messages", authed()),
            route("messages-compose", "/messages/compose", authed()),
            route("messages-detail", "/messages/:id", authed()),
            route("help-search", "/help", authed()),
            route("help-article", "/help/:id", authed()),
        ])
    }
}
