//! Route table and navigation guard.
//!
//! Routes form a tree. A child path is relative to its parent, and a child
//! inherits its parent's access rules unless it sets its own roles. The guard
//! decides, for a requested path and the current session, whether to render a
//! route or redirect:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | no route matches | redirect to [`NOT_FOUND_PATH`] |
//! | route requires auth, no token | redirect to [`LOGIN_PATH`] |
//! | route lists roles, session role not among them | redirect to [`UNAUTHORIZED_PATH`] |
//! | otherwise | render with the extracted `:param` values |
//!
//! Roles only gate routes that require auth.
//!
//! # Example
//!
//! ```
//! use ticketdesk_client::auth_store::AuthState;
//! use ticketdesk_client::routes::{Navigation, RouteTable, LOGIN_PATH};
//!
//! let table = RouteTable::default();
//! let signed_out = AuthState::default();
//! assert_eq!(table.resolve("/account/profile", &signed_out), Navigation::Redirect(LOGIN_PATH));
//! ```

use crate::auth_store::AuthState;
use std::collections::BTreeMap;
use ticketdesk_core::types::UserRole;

/// Sign-in page
pub const LOGIN_PATH: &str = "/login";
/// Page shown when the role does not allow a route
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
/// Page shown for unknown paths
pub const NOT_FOUND_PATH: &str = "/not-found";

/// Route declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    name: Option<String>,
    title: Option<String>,
    requires_auth: bool,
    roles: Vec<UserRole>,
    children: Vec<Route>,
}

impl Route {
    /// Route at `path` (absolute at the top level, relative below).
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            title: None,
            requires_auth: false,
            roles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name used to build links. Routes without a name only group children.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Require a session.
    #[must_use]
    pub const fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Require a session with one of `roles`.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = UserRole>) -> Self {
        self.requires_auth = true;
        self.roles = roles.into_iter().collect();
        self
    }

    /// Nested routes.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = children.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Flattened route with its effective access rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    name: String,
    path: String,
    title: Option<String>,
    requires_auth: bool,
    roles: Vec<UserRole>,
    segments: Vec<Segment>,
}

impl ResolvedRoute {
    /// Route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path pattern, e.g. `/events/:eventId`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether a session is required.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Roles allowed in; empty means any signed-in role.
    #[must_use]
    pub fn roles(&self) -> &[UserRole] {
        &self.roles
    }

    fn matches(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {},
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                },
            }
        }
        Some(params)
    }

    fn allows(&self, auth: &AuthState) -> Result<(), &'static str> {
        if !self.requires_auth {
            return Ok(());
        }
        if !auth.is_authenticated() {
            return Err(LOGIN_PATH);
        }
        if !self.roles.is_empty() && !auth.role.is_some_and(|role| self.roles.contains(&role)) {
            return Err(UNAUTHORIZED_PATH);
        }
        Ok(())
    }
}

/// Guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// Render `route` with the extracted parameters
    Render {
        /// Matched route
        route: &'a ResolvedRoute,
        /// `:param` values by name
        params: BTreeMap<String, String>,
    },
    /// Navigate to this path instead
    Redirect(&'static str),
}

/// Flattened route tree.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<ResolvedRoute>,
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    let parent = parent.trim_end_matches('/');
    if child.is_empty() {
        if parent.is_empty() { "/".to_string() } else { parent.to_string() }
    } else {
        format!("{parent}/{child}")
    }
}

impl RouteTable {
    /// Table for `routes`, matched in declaration order (parents before
    /// their children).
    #[must_use]
    pub fn new(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut resolved = Vec::new();
        for route in routes {
            Self::flatten(&route, "", false, &[], &mut resolved);
        }
        Self { routes: resolved }
    }

    fn flatten(
        route: &Route,
        parent: &str,
        parent_auth: bool,
        parent_roles: &[UserRole],
        out: &mut Vec<ResolvedRoute>,
    ) {
        let path = join(parent, &route.path);
        let requires_auth = parent_auth || route.requires_auth;
        let roles = if route.roles.is_empty() {
            parent_roles.to_vec()
        } else {
            route.roles.clone()
        };

        if let Some(name) = &route.name {
            let segments = split(&path)
                .into_iter()
                .map(|part| match part.strip_prefix(':') {
                    Some(param) => Segment::Param(param.to_string()),
                    None => Segment::Literal(part.to_string()),
                })
                .collect();
            out.push(ResolvedRoute {
                name: name.clone(),
                path: path.clone(),
                title: route.title.clone(),
                requires_auth,
                roles: roles.clone(),
                segments,
            });
        }

        for child in &route.children {
            Self::flatten(child, &path, requires_auth, &roles, out);
        }
    }

    /// Every named route, flattened.
    pub fn routes(&self) -> impl Iterator<Item = &ResolvedRoute> {
        self.routes.iter()
    }

    /// Route named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ResolvedRoute> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Route matching `path`. Query string and fragment are ignored.
    #[must_use]
    pub fn matching(&self, path: &str) -> Option<(&ResolvedRoute, BTreeMap<String, String>)> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let parts = split(path);
        self.routes
            .iter()
            .find_map(|route| route.matches(&parts).map(|params| (route, params)))
    }

    /// Decide what to show for `path` given the session.
    #[must_use]
    pub fn resolve(&self, path: &str, auth: &AuthState) -> Navigation<'_> {
        let Some((route, params)) = self.matching(path) else {
            tracing::debug!(path, "No route matches");
            return Navigation::Redirect(NOT_FOUND_PATH);
        };
        match route.allows(auth) {
            Ok(()) => Navigation::Render { route, params },
            Err(target) => {
                tracing::debug!(path, route = %route.name, redirect = target, "Navigation blocked");
                Navigation::Redirect(target)
            },
        }
    }

    /// Path of route `name` with its parameters filled from `params`.
    ///
    /// Returns `None` for unknown routes or missing parameters.
    #[must_use]
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let route = self.find(name)?;
        let mut path = String::new();
        for segment in &route.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(param) => {
                    let (_, value) = params.iter().find(|(key, _)| key == param)?;
                    path.push_str(value);
                },
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

impl Default for RouteTable {
    /// The application's pages.
    fn default() -> Self {
        Self::new([
            Route::new("/").named("home").with_title("Home").requires_auth(),
            Route::new(LOGIN_PATH).named("login").with_title("Login"),
            Route::new("/register").named("register").with_title("Register"),
            Route::new(UNAUTHORIZED_PATH)
                .named("unauthorized")
                .with_title("Unauthorized"),
            Route::new(NOT_FOUND_PATH).named("not-found").with_title("Not Found"),
            Route::new("/events").with_children([
                Route::new("").named("events").with_title("Events"),
                Route::new(":eventId").named("event-details").with_title("Event"),
            ]),
            Route::new("/checkout/:eventId")
                .named("checkout")
                .with_title("Checkout")
                .requires_auth(),
            Route::new("/account").requires_auth().with_children([
                Route::new("profile").named("profile").with_title("Profile"),
                Route::new("tickets").named("my-tickets").with_title("My Tickets"),
                Route::new("tickets/:ticketId")
                    .named("my-ticket")
                    .with_title("Ticket"),
                Route::new("payments").named("my-payments").with_title("My Payments"),
                Route::new("attendees")
                    .named("my-attendees")
                    .with_title("My Attendees"),
                Route::new("calendar").named("calendar").with_title("Calendar"),
            ]),
            Route::new("/admin").with_roles([UserRole::Admin]).with_children([
                Route::new("").named("admin").with_title("Dashboard"),
                Route::new("events").named("admin-events").with_title("Events"),
                Route::new("events/new")
                    .named("admin-event-create")
                    .with_title("New Event"),
                Route::new("events/:eventId")
                    .named("admin-event-edit")
                    .with_title("Edit Event"),
                Route::new("users").named("admin-users").with_title("Users"),
                Route::new("users/:userId")
                    .named("admin-user-edit")
                    .with_title("Edit User"),
                Route::new("tickets").named("admin-tickets").with_title("Tickets"),
                Route::new("attendees")
                    .named("admin-attendees")
                    .with_title("Attendees"),
                Route::new("payments").named("admin-payments").with_title("Payments"),
                Route::new("images").named("admin-images").with_title("Images"),
            ]),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn session(role: Option<UserRole>) -> AuthState {
        AuthState {
            token: Some("jwt".to_string()),
            role,
        }
    }

    #[test]
    fn test_public_route_renders_with_params() {
        let table = RouteTable::default();
        let Navigation::Render { route, params } = table.resolve("/events/42?tab=map", &AuthState::default())
        else {
            unreachable!("public route redirected");
        };
        assert_eq!(route.name(), "event-details");
        assert_eq!(params.get("eventId").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_unknown_path_goes_to_not_found() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/nowhere", &session(None)), Navigation::Redirect(NOT_FOUND_PATH));
    }

    #[test]
    fn test_home_requires_a_session() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/", &AuthState::default()), Navigation::Redirect(LOGIN_PATH));
        assert!(matches!(
            table.resolve("/", &session(Some(UserRole::User))),
            Navigation::Render { route, .. } if route.name() == "home"
        ));
    }

    #[test]
    fn test_auth_is_inherited_by_children() {
        let table = RouteTable::default();
        assert_eq!(table.resolve("/account/tickets", &AuthState::default()), Navigation::Redirect(LOGIN_PATH));
        assert!(matches!(
            table.resolve("/account/tickets", &session(Some(UserRole::User))),
            Navigation::Render { .. }
        ));
    }

    #[test]
    fn test_admin_routes_check_role() {
        let table = RouteTable::default();
        assert_eq!(
            table.resolve("/admin/users", &session(Some(UserRole::User))),
            Navigation::Redirect(UNAUTHORIZED_PATH)
        );
        assert_eq!(
            table.resolve("/admin/users", &session(None)),
            Navigation::Redirect(UNAUTHORIZED_PATH)
        );
        assert_eq!(table.resolve("/admin", &AuthState::default()), Navigation::Redirect(LOGIN_PATH));
        assert!(matches!(
            table.resolve("/admin/", &session(Some(UserRole::Admin))),
            Navigation::Render { route, .. } if route.name() == "admin"
        ));
    }

    #[test]
    fn test_literal_declared_before_param_wins() {
        let table = RouteTable::default();
        let (route, params) = table.matching("/admin/events/new").unwrap();
        assert_eq!(route.name(), "admin-event-create");
        assert!(params.is_empty());
    }

    #[test]
    fn test_roles_ignored_without_requires_auth() {
        let mut route = Route::new("/open").named("open");
        route.roles = vec![UserRole::Admin];
        let table = RouteTable::new([route]);
        assert!(matches!(table.resolve("/open", &AuthState::default()), Navigation::Render { .. }));
    }

    #[test]
    fn test_href() {
        let table = RouteTable::default();
        assert_eq!(table.href("home", &[]).as_deref(), Some("/"));
        assert_eq!(
            table.href("admin-event-edit", &[("eventId", "7")]).as_deref(),
            Some("/admin/events/7")
        );
        assert_eq!(table.href("admin-event-edit", &[]), None);
        assert_eq!(table.href("missing", &[]), None);
    }
}
