//! Dashboard routes and the guard that gates them.

use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

use crate::models::Role;
use crate::session::Session;

/// A dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Route {
    Login,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Users,
    Recipes,
    News,
    Notifications,
    Analytics,
    Profile,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ADMIN_AND_STAFF: &[Role] = &[Role::Admin, Role::Staff];

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Dashboard => "/",
            Self::Users => "/users",
            Self::Recipes => "/recipes",
            Self::News => "/news",
            Self::Notifications => "/notifications",
            Self::Analytics => "/analytics",
            Self::Profile => "/profile",
        }
    }

    /// Login family routes, reachable without a session.
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::ForgotPassword | Self::ResetPassword)
    }

    /// Roles allowed on a protected route. Empty for public routes.
    #[must_use]
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::Login | Self::ForgotPassword | Self::ResetPassword => &[],
            Self::Users | Self::Analytics => ADMIN_ONLY,
            Self::Dashboard | Self::Recipes | Self::News | Self::Notifications | Self::Profile => {
                ADMIN_AND_STAFF
            }
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::iter().find(|route| route.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::from_path(path).ok_or_else(|| format!("unknown route: {path}"))
    }
}

/// Outcome of navigating to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

/// Where a freshly signed-in operator lands.
#[must_use]
pub fn default_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::Dashboard,
        Role::Staff => Route::Recipes,
    }
}

/// Decide whether `session` may view `route`.
#[must_use]
pub fn resolve(session: Option<&Session>, route: Route) -> Decision {
    match session {
        None if route.is_public() => Decision::Allow,
        None => Decision::Redirect(Route::Login),
        Some(session) if route.is_public() => Decision::Redirect(default_route(session.role)),
        Some(session) if route.allowed_roles().contains(&session.role) => Decision::Allow,
        Some(session) => Decision::Redirect(default_route(session.role)),
    }
}

/// Every route `session` may view, in menu order.
#[must_use]
pub fn reachable_routes(session: Option<&Session>) -> Vec<Route> {
    Route::iter()
        .filter(|route| resolve(session, *route) == Decision::Allow)
        .collect()
}
