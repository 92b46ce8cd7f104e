//! # HIMS Access
//!
//! Role-capability gating for the hospital front end.
//!
//! This crate answers one question for every navigable part of the application: may the
//! current operator enter it?
//!
//! - [`Role`] and [`Section`] are closed enumerations. There are no string role tags anywhere
//!   else in the workspace.
//! - [`RoutePolicy`] is the single source of truth: one exhaustive `match` from section to the
//!   roles allowed in it. Adding a section without deciding its allow-list is a compile error.
//! - [`AccessGate`] wraps route entry. It is used for direct navigation (typed URL, deep link)
//!   and, through [`NavigationMenu`], for deciding which menu entries are shown. Both paths use
//!   the same predicate, so a visible entry is always enterable and a denied section is never
//!   reachable.
//! - [`OperatorSession`] is the explicit, passed-down login session produced by
//!   [`OperatorDirectory::authenticate`]. Its role cannot change after construction.
//!
//! A denied section is not an error: the gate answers with a redirect to the default section.

pub mod auth;
pub mod constants;
pub mod gate;
pub mod policy;
pub mod role;

pub use auth::{AuthError, DirectoryError, OperatorAccount, OperatorDirectory, OperatorSession};
pub use constants::DEFAULT_SECTION;
pub use gate::{AccessGate, GuardOutcome, NavEntry, NavigationMenu, PublicPage, Route, RouteTable};
pub use policy::RoutePolicy;
pub use role::{Role, Section, UnknownTag};
