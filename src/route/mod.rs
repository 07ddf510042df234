//! # Route Module
//!
//! The immutable route-tree model: user-facing route definitions, the
//! arena-backed [`RouteTree`] they compile into, and eager construction-time
//! validation.
//!
//! ## Overview
//!
//! Callers describe navigation declaratively as a nested tree of
//! definitions: leaf routes produce content (or redirect), shell routes wrap
//! their matched descendants in a navigation container, and multi-branch
//! shells partition children into independently-stacked branches.
//! [`RouteTree::build`] flattens that description into an arena indexed by
//! [`RouteId`], compiling every path pattern exactly once and rejecting
//! misconfiguration before anything can reach resolution time.
//!
//! ## Identity
//!
//! Routes and containers are identified by explicit stable values, not by
//! object identity: [`RouteId`] is an arena index, [`ContainerId`] is either
//! caller-assigned or a generated ULID. Match lists and persisted branch
//! state reference routes through these identifiers.

mod def;
mod tree;

pub use def::{
    Branch, BranchShell, BranchShellFn, ContentFn, RedirectFn, Route, RouteDef, ShellContentFn,
    SingleShell,
};
pub use tree::{RouteId, RouteTree, TreeError};

pub(crate) use tree::{BranchMeta, RouteEntry, RouteKind};

use std::fmt;
use std::sync::Arc;

/// Stable identifier of a navigation container.
///
/// Assigned at construction, pluggable by the caller; shells and branches
/// that do not name one get a generated ULID. Container identity is how a
/// descendant route targets a particular ancestor navigation stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(Arc<str>);

impl ContainerId {
    /// An explicit, caller-chosen identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// A generated identifier, unique per process.
    #[must_use]
    pub fn generate() -> Self {
        Self(Arc::from(ulid::Ulid::new().to_string()))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
