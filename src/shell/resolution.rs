//! Container resolution: which navigation container a matched descendant
//! renders onto, and which branch of a multi-branch shell that makes
//! active.

use super::ShellError;
use crate::host::NavHost;
use crate::matchlist::MatchList;
use crate::route::{ContainerId, RouteId, RouteKind, RouteTree};

/// Resolve the container for the route following the shell at chain
/// position `k`.
///
/// The target route at `k + 1` either declares an explicit container
/// identifier, which is looked up across the enclosing shell chain, or is
/// owned by the immediately enclosing shell (for a multi-branch shell, by
/// the branch whose route list contains it).
///
/// # Errors
///
/// [`ShellError::NoTargetRoute`] when the shell is the deepest entry, and
/// [`ShellError::NavigatorNotFound`] when an explicit identifier matches no
/// enclosing shell. Trees reject dangling identifiers at construction, so
/// the latter only fires for chains not produced by this tree.
pub fn target_container<H: NavHost>(
    tree: &RouteTree<H>,
    list: &MatchList,
    k: usize,
) -> Result<ContainerId, ShellError> {
    let entries = list.entries();
    let target = entries.get(k + 1).ok_or(ShellError::NoTargetRoute)?.route;

    if let RouteKind::Leaf {
        container: Some(explicit),
        ..
    } = &tree.entry(target).kind
    {
        for entry in entries[..=k].iter().rev() {
            if shell_owns(tree, entry.route, explicit) {
                return Ok(explicit.clone());
            }
        }
        return Err(ShellError::NavigatorNotFound {
            container: explicit.clone(),
        });
    }

    owning_container(tree, entries[k].route, target)
}

/// The branch of `shell` (at chain position `k`) that the current location
/// renders into.
///
/// # Errors
///
/// Propagates [`target_container`] failures;
/// [`ShellError::NavigatorNotFound`] when the resolved container belongs to
/// no branch of this shell.
pub fn active_branch<H: NavHost>(
    tree: &RouteTree<H>,
    shell: RouteId,
    list: &MatchList,
    k: usize,
) -> Result<usize, ShellError> {
    let container = target_container(tree, list, k)?;
    let RouteKind::BranchShell { branches, .. } = &tree.entry(shell).kind else {
        return Err(ShellError::WrongShellKind);
    };
    branches
        .iter()
        .position(|b| b.container == container)
        .ok_or(ShellError::NavigatorNotFound { container })
}

/// True when `route` is a shell owning `container`.
fn shell_owns<H: NavHost>(tree: &RouteTree<H>, route: RouteId, container: &ContainerId) -> bool {
    match &tree.entry(route).kind {
        RouteKind::SingleShell { container: own, .. } => own == container,
        RouteKind::BranchShell { branches, .. } => {
            branches.iter().any(|b| &b.container == container)
        }
        RouteKind::Leaf { .. } => false,
    }
}

/// The container the shell `shell` assigns to its direct child `target`.
fn owning_container<H: NavHost>(
    tree: &RouteTree<H>,
    shell: RouteId,
    target: RouteId,
) -> Result<ContainerId, ShellError> {
    match &tree.entry(shell).kind {
        RouteKind::SingleShell { container, .. } => Ok(container.clone()),
        RouteKind::BranchShell { branches, .. } => branches
            .iter()
            .find(|b| b.routes.contains(&target))
            .map(|b| b.container.clone())
            .ok_or(ShellError::ShellNotInChain),
        RouteKind::Leaf { .. } => Err(ShellError::WrongShellKind),
    }
}

/// Derived restoration key for one branch: the branch's explicit
/// restoration id if present, else a structural key under the shell's
/// scope.
pub(crate) fn branch_key<H: NavHost>(tree: &RouteTree<H>, shell: RouteId, index: usize) -> String {
    let RouteKind::BranchShell {
        restoration_scope_id,
        branches,
        ..
    } = &tree.entry(shell).kind
    else {
        return format!("treenav.shell{}.branch{index}", shell.0);
    };

    if let Some(explicit) = branches.get(index).and_then(|b| b.restoration_id.clone()) {
        return explicit;
    }

    match restoration_scope_id {
        Some(scope) => format!("{scope}.branch{index}"),
        None => format!("treenav.shell{}.branch{index}", shell.0),
    }
}
