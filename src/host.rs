//! Host-framework boundary: the collaborators the core calls into.
//!
//! The core never touches the widget tree or the platform history stack. It
//! asks the host to build navigation containers, hands resolved parameters
//! to route-supplied builder functions, and triggers re-resolution through
//! the host when a branch switch or redirect needs a new location.

use serde_json::Value;
use std::collections::HashMap;

use crate::location::Location;
use crate::matcher::ParamVec;
use crate::route::ContainerId;

/// The retained-mode framework the router renders into.
///
/// `Content` is whatever the framework's element type is; `Container` is its
/// navigation-stack handle. The core never inspects either, it only stores
/// containers for reuse and passes content through.
pub trait NavHost {
    /// Rendered output of builder functions (opaque to the core).
    type Content;
    /// Navigation-stack handle (opaque; held per branch and reused).
    type Container;
    /// Navigation observer attached to a container at build time.
    type Observer: Clone;

    /// Build a navigation container for a shell or branch.
    ///
    /// Invoked once for a single-container shell and once per branch rebuild
    /// for a multi-branch shell.
    fn build_container(&mut self, req: ContainerRequest<Self::Observer>) -> Self::Container;

    /// Trigger a full re-resolution at `location`.
    ///
    /// Called when a branch switch restores a stored location or falls back
    /// to a branch's initial location, and when the host elects to follow a
    /// redirect asynchronously.
    fn resolve_and_navigate(&mut self, location: &str, extra: Option<Value>);
}

/// Everything the host needs to build one navigation container.
#[derive(Debug, Clone)]
pub struct ContainerRequest<O> {
    /// Stable identifier of the container being built
    pub container: ContainerId,
    /// Observers to attach to the new container
    pub observers: Vec<O>,
    /// Restoration scope for the container's own internal state, if any
    pub restoration_scope_id: Option<String>,
}

/// Resolved routing state handed to builder and redirect functions.
///
/// Borrows from the match list for the duration of one render or redirect
/// evaluation; builders copy out what they need.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    /// The full location being rendered
    pub location: &'a Location,
    /// Parameters captured by this route's own pattern
    pub params: &'a ParamVec,
    /// All path parameters along the matched chain (descendant wins on
    /// duplicate names)
    pub path_params: &'a HashMap<String, String>,
    /// Query parameters of the location
    pub query_params: &'a HashMap<String, String>,
    /// Opaque payload carried with the navigation, if any
    pub extra: Option<&'a Value>,
}

impl<'a> RouteContext<'a> {
    /// Look up a path parameter by name anywhere along the matched chain.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}
