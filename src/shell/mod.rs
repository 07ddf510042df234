//! # Shell Module
//!
//! Shell resolution and the stateful multi-branch shell.
//!
//! ## Overview
//!
//! A shell wraps matched descendants in a navigation container. This module
//! answers two questions:
//!
//! 1. **Resolution**: for a shell at position `k` in a match chain, which
//!    container does the route at `k + 1` render onto, and for a
//!    multi-branch shell, which branch is therefore active?
//! 2. **State**: when must a branch's container be rebuilt, and when can
//!    the existing instance be reused so stateful content inside an
//!    inactive branch survives branch switches?
//!
//! ## Branch lifecycle
//!
//! Each branch moves from unvisited (no stored match list, no container) to
//! built. A render pass rebuilds the active branch's container only when
//! its match list changed by value or it was never built; an identical list
//! reuses the instance. Branch histories persist across restarts through
//! the host's restoration store, one key per branch, with per-branch
//! fallback to unvisited on decode failure.

mod resolution;
mod stateful;

pub use resolution::{active_branch, target_container};
pub use stateful::{SingleShellState, StatefulShell};

use std::fmt;

use crate::host::NavHost;
use crate::route::ContainerId;

/// View of a multi-branch shell's containers handed to its builder.
///
/// Unbuilt branches are `None`; the active branch is always built by the
/// time the builder runs.
pub struct BranchContainers<'a, H: NavHost> {
    pub(crate) active: usize,
    pub(crate) containers: Vec<Option<&'a H::Container>>,
}

impl<'a, H: NavHost> BranchContainers<'a, H> {
    /// Index of the branch the current location renders into.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Number of branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// True for a shell with no branches (rejected at construction, so
    /// never observed from a validated tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Container of branch `index`, if that branch has been built.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a H::Container> {
        self.containers.get(index).copied().flatten()
    }

    /// The active branch's container.
    #[must_use]
    pub fn active_container(&self) -> Option<&'a H::Container> {
        self.get(self.active)
    }
}

/// Shell resolution or shell-state error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// A branch-switch index is outside the valid branch range
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of branches
        len: usize,
    },
    /// An unvisited branch has no initial location and no leaf descendant
    NoDefaultRoute {
        /// Index of the offending branch
        index: usize,
    },
    /// A target container identifier matched no shell in the ancestor chain
    NavigatorNotFound {
        /// The identifier that resolved to nothing
        container: ContainerId,
    },
    /// The shell this state object owns is not part of the match chain
    ShellNotInChain,
    /// A shell is the deepest entry of the chain, so there is no target
    /// route to resolve a container for
    NoTargetRoute,
    /// The route id handed to a shell-state constructor is not a shell of
    /// the expected kind
    WrongShellKind,
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "shell error: branch index {index} is out of range for a shell \
                    with {len} branches"
                )
            }
            ShellError::NoDefaultRoute { index } => {
                write!(
                    f,
                    "shell error: branch {index} has never been visited, declares no \
                    initial location, and contains no leaf route to fall back to"
                )
            }
            ShellError::NavigatorNotFound { container } => {
                write!(
                    f,
                    "shell error: container '{container}' was not found among the \
                    enclosing shells of the matched chain"
                )
            }
            ShellError::ShellNotInChain => {
                write!(
                    f,
                    "shell error: the shell owning this state is not part of the \
                    current match chain"
                )
            }
            ShellError::NoTargetRoute => {
                write!(
                    f,
                    "shell error: the shell is the deepest matched route, so no \
                    descendant selects a container"
                )
            }
            ShellError::WrongShellKind => {
                write!(
                    f,
                    "shell error: the route id handed to this shell state is not a \
                    shell of the expected kind"
                )
            }
        }
    }
}

impl std::error::Error for ShellError {}
