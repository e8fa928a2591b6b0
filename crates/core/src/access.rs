//! # Route Authorization Guard
//!
//! One declarative route table and one decision function over
//! (authentication state, requested path).

use crate::model::Role;
use serde::Serialize;
use std::fmt;

pub const LOGIN_ROUTE: &str = "/login";
pub const STAFF_HOME: &str = "/dashboard";
pub const BORROWER_HOME: &str = "/my-loans";

/// Session state as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "role")]
pub enum AuthState {
    /// Session bootstrap has not resolved yet
    Loading,
    Unauthenticated,
    Authenticated(Role),
}

impl AuthState {
    pub fn role(&self) -> Option<Role> {
        match self {
            AuthState::Authenticated(role) => Some(*role),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Loading => f.write_str("loading"),
            AuthState::Unauthenticated => f.write_str("unauthenticated"),
            AuthState::Authenticated(role) => write!(f, "authenticated({})", role),
        }
    }
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Login-type pages; signed-in users are sent home
    Public,
    /// `/`: always redirects
    RoleHome,
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: &'static str,
    pub access: Access,
}

const fn rule(pattern: &'static str, access: Access) -> RouteRule {
    RouteRule { pattern, access }
}

const INTERNAL: Access = Access::Roles(Role::INTERNAL);
const ORIGINATION: Access = Access::Roles(&[Role::Admin, Role::CreditOfficer]);
const PAYMENT_ENTRY: Access = Access::Roles(&[Role::Admin, Role::CreditOfficer, Role::Collections]);
const COLLECTIONS: Access = Access::Roles(&[Role::Admin, Role::Collections]);
const BORROWER_ONLY: Access = Access::Roles(&[Role::Borrower]);

/// Literal routes are listed before the parameterized routes they overlap.
pub const ROUTES: &[RouteRule] = &[
    rule("/login", Access::Public),
    rule("/register", Access::Public),
    rule("/forgot-password", Access::Public),
    rule("/", Access::RoleHome),
    rule("/dashboard", INTERNAL),
    rule("/loans", INTERNAL),
    rule("/loans/new", ORIGINATION),
    rule("/loans/:id/edit", ORIGINATION),
    rule("/loans/:id", INTERNAL),
    rule("/borrowers", INTERNAL),
    rule("/borrowers/new", ORIGINATION),
    rule("/borrowers/:id/edit", ORIGINATION),
    rule("/borrowers/:id", INTERNAL),
    rule("/properties", INTERNAL),
    rule("/properties/new", ORIGINATION),
    rule("/properties/:id/edit", ORIGINATION),
    rule("/properties/:id", INTERNAL),
    rule("/payments", INTERNAL),
    rule("/payments/new", PAYMENT_ENTRY),
    rule("/payments/overdue", INTERNAL),
    rule("/collections", COLLECTIONS),
    rule("/collections/new/:loanId", COLLECTIONS),
    rule("/documents", INTERNAL),
    rule("/my-loans", BORROWER_ONLY),
];

/// Outcome of one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum GuardDecision {
    /// Show a placeholder until the session resolves
    Wait,
    Allow,
    #[serde(rename_all = "camelCase")]
    RedirectToLogin { return_to: String },
    RedirectToHome { route: &'static str },
    NotFound,
}

impl GuardDecision {
    /// Where the navigation ends up, for redirects.
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardDecision::RedirectToLogin { return_to } if return_to != LOGIN_ROUTE => {
                Some(format!("{}?returnTo={}", LOGIN_ROUTE, return_to))
            }
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_ROUTE.to_string()),
            GuardDecision::RedirectToHome { route } => Some(route.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for GuardDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardDecision::Wait => f.write_str("wait"),
            GuardDecision::Allow => f.write_str("allow"),
            GuardDecision::RedirectToLogin { return_to } => {
                write!(f, "redirect to {} (return to {})", LOGIN_ROUTE, return_to)
            }
            GuardDecision::RedirectToHome { route } => write!(f, "redirect to {}", route),
            GuardDecision::NotFound => f.write_str("not found"),
        }
    }
}

/// Fixed landing page per role.
pub fn home_route(role: Role) -> &'static str {
    match role {
        Role::Borrower => BORROWER_HOME,
        _ => STAFF_HOME,
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let bare = &path[..end];
    match bare.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut want = pattern.split('/');
    let mut got = path.split('/');
    loop {
        match (want.next(), got.next()) {
            (None, None) => return true,
            (Some(w), Some(g)) => {
                let ok = if w.starts_with(':') { !g.is_empty() } else { w == g };
                if !ok {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// First rule matching the path; query string and trailing slash ignored.
pub fn match_route(path: &str) -> Option<&'static RouteRule> {
    let bare = strip_query(path);
    ROUTES.iter().find(|r| pattern_matches(r.pattern, bare))
}

/// Roles allowed on a path, `None` for public, root or unknown paths.
pub fn allowed_roles(path: &str) -> Option<&'static [Role]> {
    match match_route(path)?.access {
        Access::Roles(roles) => Some(roles),
        _ => None,
    }
}

pub fn authorize(state: AuthState, path: &str) -> GuardDecision {
    let Some(rule) = match_route(path) else {
        return GuardDecision::NotFound;
    };

    let role = match state {
        AuthState::Loading => return GuardDecision::Wait,
        AuthState::Unauthenticated => {
            return match rule.access {
                Access::Public => GuardDecision::Allow,
                _ => GuardDecision::RedirectToLogin {
                    return_to: path.to_string(),
                },
            };
        }
        AuthState::Authenticated(role) => role,
    };

    match rule.access {
        Access::Public | Access::RoleHome => GuardDecision::RedirectToHome {
            route: home_route(role),
        },
        Access::Roles(allowed) if allowed.contains(&role) => GuardDecision::Allow,
        Access::Roles(_) => GuardDecision::RedirectToHome {
            route: home_route(role),
        },
    }
}
