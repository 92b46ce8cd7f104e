//! Route table, access gate, and navigation menu.
//!
//! The gate and the menu share one predicate, [`RoutePolicy::can_access`]. The menu never
//! computes visibility on its own.

use crate::constants::{DEFAULT_SECTION, LOGIN_PATH, QUEUE_DISPLAY_PATH};
use crate::{OperatorSession, Role, RoutePolicy, Section};
use serde::Serialize;

/// Pages that bypass the gate entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicPage {
    Login,
    QueueDisplay,
}

impl PublicPage {
    pub fn path(self) -> &'static str {
        match self {
            PublicPage::Login => LOGIN_PATH,
            PublicPage::QueueDisplay => QUEUE_DISPLAY_PATH,
        }
    }
}

/// One entry of the route table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Route {
    /// Unauthenticated page.
    Public { path: &'static str, page: PublicPage },
    /// Page rendered only if the operator's role is in `allowed_roles`.
    Guarded {
        path: &'static str,
        section: Section,
        allowed_roles: &'static [Role],
    },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Public { path, .. } | Route::Guarded { path, .. } => *path,
        }
    }
}

/// Ordered list of routes: the two public pages first, then one guarded route per section.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Builds the table from [`RoutePolicy`]. Allow-lists are never restated here.
    pub fn new() -> Self {
        let mut routes = vec![
            Route::Public {
                path: LOGIN_PATH,
                page: PublicPage::Login,
            },
            Route::Public {
                path: QUEUE_DISPLAY_PATH,
                page: PublicPage::QueueDisplay,
            },
        ];
        routes.extend(Section::ALL.into_iter().map(|section| Route::Guarded {
            path: section.path(),
            section,
            allowed_roles: RoutePolicy::allowed_roles(section),
        }));

        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Looks up a path. Leading/trailing slashes are ignored.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let normalised = path.trim_matches('/');
        self.routes.iter().find(|route| route.path() == normalised)
    }
}

/// What the router should do with a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "target", rename_all = "kebab-case")]
pub enum GuardOutcome {
    /// Render the guarded section.
    Render(Section),
    /// Render a public page.
    RenderPublic(PublicPage),
    /// Silently send the operator to another section instead.
    Redirect(Section),
    /// No operator session; send to the login page.
    RedirectToLogin,
}

/// Wraps route entry with the role check.
#[derive(Clone, Debug, Default)]
pub struct AccessGate {
    table: RouteTable,
}

impl AccessGate {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn can_access(&self, role: Role, section: Section) -> bool {
        RoutePolicy::can_access(role, section)
    }

    /// Renders `section` if `role` may enter it, otherwise redirects to the default section.
    pub fn guard_route(&self, role: Role, section: Section) -> GuardOutcome {
        if self.can_access(role, section) {
            GuardOutcome::Render(section)
        } else {
            tracing::debug!(%role, %section, "access denied; redirecting to {}", DEFAULT_SECTION);
            GuardOutcome::Redirect(DEFAULT_SECTION)
        }
    }

    /// Resolves a raw path as typed in the address bar.
    ///
    /// Public pages render without a session. Guarded pages without a session go to login.
    /// The empty path and unknown paths land on the default section (subject to the same
    /// check, which every role passes).
    pub fn navigate(&self, session: Option<&OperatorSession>, path: &str) -> GuardOutcome {
        let route = if path.trim_matches('/').is_empty() {
            self.table.resolve(DEFAULT_SECTION.path())
        } else {
            self.table.resolve(path)
        };

        match (route, session) {
            (Some(Route::Public { page, .. }), _) => GuardOutcome::RenderPublic(*page),
            (_, None) => GuardOutcome::RedirectToLogin,
            (Some(Route::Guarded { section, .. }), Some(session)) => {
                self.guard_route(session.role(), *section)
            }
            (None, Some(_)) => {
                tracing::debug!(path, "unknown route; redirecting to {}", DEFAULT_SECTION);
                GuardOutcome::Redirect(DEFAULT_SECTION)
            }
        }
    }
}

/// A visible navigation-menu entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub section: Section,
    pub path: &'static str,
    pub label_key: &'static str,
}

/// Navigation menu filtered by the gate's predicate.
pub struct NavigationMenu;

impl NavigationMenu {
    /// Entries visible to `role`, in route-table order.
    pub fn for_role(gate: &AccessGate, role: Role) -> Vec<NavEntry> {
        gate.table()
            .routes()
            .iter()
            .filter_map(|route| match route {
                Route::Guarded { section, path, .. } if gate.can_access(role, *section) => {
                    Some(NavEntry {
                        section: *section,
                        path: *path,
                        label_key: section.label_key(),
                    })
                }
                _ => None,
            })
            .collect()
    }
}
