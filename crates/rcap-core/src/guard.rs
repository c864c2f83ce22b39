//! Navigation guards.
//!
//! Guards run before a navigation completes and either allow it or name a
//! route to go to instead. They only read session state.

use crate::route::{HOME, LOGIN, ResolvedRoute};
use crate::session::SessionHandle;
use crate::user::Role;

/// What the session looks like to a guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardContext {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl GuardContext {
    pub async fn from_session(session: &SessionHandle) -> Self {
        Self {
            authenticated: session.is_authenticated().await,
            role: session.role().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Name of the route to go to.
    pub name: String,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    fn redirect(name: &str) -> Self {
        Self::Redirect(Redirect {
            name: name.to_string(),
            query: Vec::new(),
        })
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Sends signed-out users to the login page, remembering where they were going.
pub fn auth_guard(to: &ResolvedRoute, ctx: &GuardContext) -> GuardDecision {
    if to.meta().requires_auth && !ctx.authenticated {
        GuardDecision::Redirect(Redirect {
            name: LOGIN.to_string(),
            query: vec![("redirect".to_string(), to.full_path.clone())],
        })
    } else {
        GuardDecision::Allow
    }
}

/// Keeps signed-in users away from the auth pages.
pub fn guest_guard(ctx: &GuardContext) -> GuardDecision {
    if ctx.authenticated {
        GuardDecision::redirect(HOME)
    } else {
        GuardDecision::Allow
    }
}

pub fn role_guard(to: &ResolvedRoute, ctx: &GuardContext) -> GuardDecision {
    let required = &to.meta().requires_roles;
    if required.is_empty() {
        return GuardDecision::Allow;
    }
    match ctx.role {
        Some(role) if required.contains(&role) => GuardDecision::Allow,
        _ => GuardDecision::redirect(HOME),
    }
}

/// Runs the guard chain for a navigation to `to`.
///
/// Guest routes are checked by the guest guard alone. Everything else goes
/// through the auth guard and, once that allows, the role guard.
pub fn evaluate(to: &ResolvedRoute, ctx: &GuardContext) -> GuardDecision {
    if to.meta().guest_only {
        return guest_guard(ctx);
    }

    match auth_guard(to, ctx) {
        GuardDecision::Allow => role_guard(to, ctx),
        redirect => redirect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteTable;

    fn signed_in(role: Role) -> GuardContext {
        GuardContext {
            authenticated: true,
            role: Some(role),
        }
    }

    #[test]
    fn test_anonymous_is_sent_to_login_with_redirect() {
        let table = RouteTable::default();
        let to = table.resolve("/activities/3?tab=evidence");

        let decision = evaluate(&to, &GuardContext::default());

        match decision {
            GuardDecision::Redirect(redirect) => {
                assert_eq!(redirect.name, LOGIN);
                assert_eq!(
                    redirect.query,
                    vec![("redirect".to_string(), "/activities/3?tab=evidence".to_string())]
                );
            }
            GuardDecision::Allow => panic!("Expected redirect to login"),
        }
    }

    #[test]
    fn test_authenticated_user_leaves_auth_pages() {
        let table = RouteTable::default();
        let to = table.resolve("/auth/login");

        assert_eq!(
            evaluate(&to, &signed_in(Role::User)),
            GuardDecision::redirect(HOME)
        );
        assert!(evaluate(&to, &GuardContext::default()).is_allowed());
    }

    #[test]
    fn test_unlisted_auth_page_sends_user_home() {
        let table = RouteTable::default();
        let to = table.resolve("/auth/verify-email");

        assert_eq!(
            evaluate(&to, &signed_in(Role::Admin)),
            GuardDecision::redirect(HOME)
        );
        assert!(evaluate(&to, &GuardContext::default()).is_allowed());
    }

    #[test]
    fn test_role_guard_runs_after_auth() {
        let table = RouteTable::default();
        let to = table.resolve("/organisations");

        assert_eq!(
            evaluate(&to, &signed_in(Role::User)),
            GuardDecision::redirect(HOME)
        );
        assert!(evaluate(&to, &signed_in(Role::Admin)).is_allowed());
        assert!(evaluate(&to, &signed_in(Role::SuperAdmin)).is_allowed());
    }

    #[test]
    fn test_open_routes_always_allowed() {
        let table = RouteTable::default();
        assert!(evaluate(&table.resolve("/"), &GuardContext::default()).is_allowed());
        assert!(evaluate(&table.resolve("/missing"), &GuardContext::default()).is_allowed());
    }
}
