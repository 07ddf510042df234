//! Shell state objects: container ownership, branch diffing, branch
//! switching, and per-branch persistence.

use tracing::{debug, info, warn};

use super::{resolution, BranchContainers, ShellError};
use crate::host::{ContainerRequest, NavHost, RouteContext};
use crate::matchlist::{DecodeError, MatchList, RestorableMatchList};
use crate::restoration::{ScopedRestoration, SharedStore};
use crate::route::{RouteId, RouteKind, RouteTree};

/// State for a single-container shell: the container is built exactly once
/// and reused on every subsequent render pass.
pub struct SingleShellState<H: NavHost> {
    shell: RouteId,
    container: Option<H::Container>,
}

impl<H: NavHost> std::fmt::Debug for SingleShellState<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleShellState")
            .field("shell", &self.shell)
            .field("built", &self.container.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: NavHost> SingleShellState<H> {
    /// State for the single-container shell `shell`.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongShellKind`] when `shell` is not a single shell.
    pub fn new(tree: &RouteTree<H>, shell: RouteId) -> Result<Self, ShellError> {
        if !matches!(tree.entry(shell).kind, RouteKind::SingleShell { .. }) {
            return Err(ShellError::WrongShellKind);
        }
        Ok(Self {
            shell,
            container: None,
        })
    }

    /// Render the shell for the current match chain.
    ///
    /// # Errors
    ///
    /// [`ShellError::ShellNotInChain`] when the chain does not contain this
    /// shell.
    pub fn update(
        &mut self,
        tree: &RouteTree<H>,
        list: &MatchList,
        host: &mut H,
    ) -> Result<H::Content, ShellError> {
        let k = list.position(self.shell).ok_or(ShellError::ShellNotInChain)?;
        let RouteKind::SingleShell {
            container,
            builder,
            observers,
            restoration_scope_id,
        } = &tree.entry(self.shell).kind
        else {
            return Err(ShellError::WrongShellKind);
        };

        let built: &H::Container = self.container.get_or_insert_with(|| {
            info!(container = %container, "building shell container");
            host.build_container(ContainerRequest {
                container: container.clone(),
                observers: observers.clone(),
                restoration_scope_id: restoration_scope_id.clone(),
            })
        });

        let entry = &list.entries()[k];
        let ctx = RouteContext {
            location: list.location(),
            params: &entry.params,
            path_params: list.path_params(),
            query_params: list.query_params(),
            extra: list.extra(),
        };
        Ok(builder(&ctx, built))
    }

    /// The shell's container, once built.
    #[must_use]
    pub fn container(&self) -> Option<&H::Container> {
        self.container.as_ref()
    }
}

struct BranchState<H: NavHost> {
    /// `None` until the branch is first visited.
    history: Option<MatchList>,
    /// Built container, reused while the branch's history is unchanged.
    container: Option<H::Container>,
}

/// State machine of a multi-branch shell.
///
/// Owns one navigation history and at most one built container per branch.
/// Render passes diff the active branch's match list by value: a changed
/// (or never-built) branch rebuilds its container, an unchanged one reuses
/// the existing instance so stateful content inside inactive branches is
/// not recreated merely because a different branch rendered.
pub struct StatefulShell<H: NavHost> {
    shell: RouteId,
    branches: Vec<BranchState<H>>,
    keys: Vec<String>,
    restoration: Option<ScopedRestoration>,
}

impl<H: NavHost> std::fmt::Debug for StatefulShell<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatefulShell")
            .field("shell", &self.shell)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl<H: NavHost> StatefulShell<H> {
    /// State for the multi-branch shell `shell`, restoring persisted branch
    /// histories from `store` when one is supplied.
    ///
    /// Restoration keys are registered for the lifetime of this value and
    /// released on drop. A branch whose persisted blob fails to decode is
    /// restored as unvisited; its siblings are unaffected.
    ///
    /// # Errors
    ///
    /// [`ShellError::WrongShellKind`] when `shell` is not a multi-branch
    /// shell.
    pub fn new(
        tree: &RouteTree<H>,
        shell: RouteId,
        store: Option<SharedStore>,
    ) -> Result<Self, ShellError> {
        let RouteKind::BranchShell { branches, .. } = &tree.entry(shell).kind else {
            return Err(ShellError::WrongShellKind);
        };

        let keys: Vec<String> = (0..branches.len())
            .map(|k| resolution::branch_key(tree, shell, k))
            .collect();
        let restoration = store.map(|s| ScopedRestoration::acquire(s, keys.clone()));

        let branches = keys
            .iter()
            .enumerate()
            .map(|(index, key)| BranchState {
                history: restoration
                    .as_ref()
                    .and_then(|scope| scope.read(key))
                    .and_then(|value| restore_history(tree, index, value)),
                container: None,
            })
            .collect();

        Ok(Self {
            shell,
            branches,
            keys,
            restoration,
        })
    }

    /// Render the shell for the current match chain.
    ///
    /// Determines the active branch, rebuilds its container if its match
    /// list changed (or it was never built), persists the branch history,
    /// and invokes the shell's builder with all branch containers.
    ///
    /// # Errors
    ///
    /// [`ShellError::ShellNotInChain`] when the chain does not contain this
    /// shell; propagates container-resolution errors.
    pub fn update(
        &mut self,
        tree: &RouteTree<H>,
        list: &MatchList,
        host: &mut H,
    ) -> Result<H::Content, ShellError> {
        let k = list.position(self.shell).ok_or(ShellError::ShellNotInChain)?;
        let active = resolution::active_branch(tree, self.shell, list, k)?;

        let RouteKind::BranchShell {
            builder, branches, ..
        } = &tree.entry(self.shell).kind
        else {
            return Err(ShellError::WrongShellKind);
        };

        let state = &mut self.branches[active];
        let changed = state.history.as_ref() != Some(list);
        if changed || state.container.is_none() {
            let meta = &branches[active];
            info!(
                branch = active,
                container = %meta.container,
                rebuilt = state.container.is_some(),
                "building branch container"
            );
            state.container = Some(host.build_container(ContainerRequest {
                container: meta.container.clone(),
                observers: meta.observers.clone(),
                restoration_scope_id: Some(self.keys[active].clone()),
            }));
            state.history = Some(list.clone());
            self.persist(tree, active);
        } else {
            debug!(branch = active, "reusing branch container");
        }

        let entry = &list.entries()[k];
        let ctx = RouteContext {
            location: list.location(),
            params: &entry.params,
            path_params: list.path_params(),
            query_params: list.query_params(),
            extra: list.extra(),
        };
        let view = BranchContainers {
            active,
            containers: self.branches.iter().map(|b| b.container.as_ref()).collect(),
        };
        Ok(builder(&ctx, view))
    }

    /// Make branch `index` active.
    ///
    /// A visited branch restores its stored location and extra payload; an
    /// unvisited one falls back to its configured initial location, else
    /// the full path of the first leaf found depth-first in its route list.
    /// Navigation happens through the host facade, which re-resolves and
    /// feeds the new chain back into [`StatefulShell::update`].
    ///
    /// # Errors
    ///
    /// [`ShellError::IndexOutOfRange`] for a bad index,
    /// [`ShellError::NoDefaultRoute`] for an unvisited branch with neither
    /// an initial location nor a leaf descendant.
    pub fn switch_branch(
        &mut self,
        index: usize,
        tree: &RouteTree<H>,
        host: &mut H,
    ) -> Result<(), ShellError> {
        let RouteKind::BranchShell { branches, .. } = &tree.entry(self.shell).kind else {
            return Err(ShellError::WrongShellKind);
        };
        if index >= branches.len() {
            return Err(ShellError::IndexOutOfRange {
                index,
                len: branches.len(),
            });
        }

        if let Some(history) = self.branches[index]
            .history
            .as_ref()
            .filter(|h| !h.is_empty())
        {
            let location = history.location().to_string();
            info!(branch = index, location = %location, "restoring branch history");
            host.resolve_and_navigate(&location, history.extra().cloned());
            return Ok(());
        }

        let meta = &branches[index];
        let location = match &meta.initial_location {
            Some(initial) => initial.clone(),
            None => default_branch_location(tree, &meta.routes)
                .ok_or(ShellError::NoDefaultRoute { index })?,
        };
        info!(branch = index, location = %location, "navigating to branch default");
        host.resolve_and_navigate(&location, None);
        Ok(())
    }

    /// Number of branches.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// The stored history of branch `index` (`None` while unvisited).
    #[must_use]
    pub fn branch_history(&self, index: usize) -> Option<&MatchList> {
        self.branches.get(index).and_then(|b| b.history.as_ref())
    }

    /// The built container of branch `index`, if any.
    #[must_use]
    pub fn branch_container(&self, index: usize) -> Option<&H::Container> {
        self.branches.get(index).and_then(|b| b.container.as_ref())
    }

    /// The derived restoration key of branch `index`.
    #[must_use]
    pub fn branch_restoration_key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    fn persist(&self, tree: &RouteTree<H>, index: usize) {
        let Some(scope) = &self.restoration else {
            return;
        };
        let value = self.branches[index]
            .history
            .as_ref()
            .map(|list| list.encode(tree))
            .and_then(|encoded| serde_json::to_value(encoded).ok());
        scope.write(&self.keys[index], value);
    }
}

/// Decode one persisted branch history, logging and dropping anything
/// unrestorable so one corrupt branch never affects its siblings.
fn restore_history<H: NavHost>(
    tree: &RouteTree<H>,
    index: usize,
    value: serde_json::Value,
) -> Option<MatchList> {
    let decoded = serde_json::from_value::<RestorableMatchList>(value)
        .map_err(DecodeError::Malformed)
        .and_then(|restorable| MatchList::decode(tree, restorable));
    match decoded {
        Ok(list) => {
            debug!(branch = index, location = %list.location(), "restored branch history");
            Some(list)
        }
        Err(err) => {
            warn!(branch = index, error = %err, "discarding unrestorable branch history");
            None
        }
    }
}

/// Full path of the first leaf found depth-first, recursing through nested
/// shells transparently.
fn default_branch_location<H: NavHost>(tree: &RouteTree<H>, routes: &[RouteId]) -> Option<String> {
    for &id in routes {
        match &tree.entry(id).kind {
            RouteKind::Leaf { .. } => return Some(tree.full_path(id).to_string()),
            RouteKind::SingleShell { .. } | RouteKind::BranchShell { .. } => {
                if let Some(found) = default_branch_location(tree, tree.children(id)) {
                    return Some(found);
                }
            }
        }
    }
    None
}
