use std::collections::HashMap;
use std::fmt;

use tracing::info;

use super::def::{BranchShellFn, ContentFn, RedirectFn, RouteDef, ShellContentFn};
use super::ContainerId;
use crate::host::NavHost;
use crate::matcher::{PathPattern, PatternAnchor, PatternError};

/// Index of a route in the tree's arena.
///
/// Route identity for match-list equality and persisted tokens; stable for
/// the lifetime of the tree and across rebuilds of the same definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(pub(crate) usize);

/// Route-tree construction error.
///
/// All variants are programmer errors detected eagerly at tree-build time,
/// so misconfiguration never reaches runtime resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A path pattern failed to compile
    InvalidPattern {
        /// The offending pattern
        path: String,
        /// The underlying compilation failure
        source: PatternError,
    },
    /// A nested route declared an absolute pattern (leading `/`)
    NestedAbsolutePattern {
        /// The offending pattern
        path: String,
    },
    /// A root-level route declared a relative pattern (no leading `/`)
    RootRelativePattern {
        /// The offending pattern
        path: String,
    },
    /// A route declared an empty name
    EmptyName {
        /// Pattern of the offending route
        path: String,
    },
    /// Two routes declared the same name
    DuplicateName {
        /// The duplicated name
        name: String,
    },
    /// A leaf route has neither a content builder nor a redirect
    MissingBuilder {
        /// Pattern of the offending route
        path: String,
    },
    /// A multi-branch shell declared no branches
    EmptyBranches,
    /// A branch declared an empty route list
    EmptyBranch {
        /// Index of the offending branch
        index: usize,
    },
    /// Two branches of one shell share a container identifier
    DuplicateContainer {
        /// The duplicated identifier
        container: ContainerId,
    },
    /// A route's explicit target container names no enclosing shell
    NavigatorNotFound {
        /// The identifier that resolved to nothing
        container: ContainerId,
        /// Pattern of the offending route
        path: String,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidPattern { path, source } => {
                write!(f, "route tree error: pattern '{path}' is invalid: {source}")
            }
            TreeError::NestedAbsolutePattern { path } => {
                write!(
                    f,
                    "route tree error: nested pattern '{path}' must be relative. \
                    Only root-level routes start with '/'."
                )
            }
            TreeError::RootRelativePattern { path } => {
                write!(
                    f,
                    "route tree error: root-level pattern '{path}' must start with '/'."
                )
            }
            TreeError::EmptyName { path } => {
                write!(
                    f,
                    "route tree error: route '{path}' declares an empty name. \
                    Omit the name or provide a non-empty one."
                )
            }
            TreeError::DuplicateName { name } => {
                write!(
                    f,
                    "route tree error: route name '{name}' is declared more than once. \
                    Names must be unique across the whole tree."
                )
            }
            TreeError::MissingBuilder { path } => {
                write!(
                    f,
                    "route tree error: route '{path}' has neither a content builder \
                    nor a redirect. At least one is required."
                )
            }
            TreeError::EmptyBranches => {
                write!(
                    f,
                    "route tree error: multi-branch shell declares no branches. \
                    At least one branch is required."
                )
            }
            TreeError::EmptyBranch { index } => {
                write!(
                    f,
                    "route tree error: branch {index} declares no routes. \
                    Every branch needs at least one route."
                )
            }
            TreeError::DuplicateContainer { container } => {
                write!(
                    f,
                    "route tree error: container id '{container}' is used by more \
                    than one branch of the same shell. Branch containers must be \
                    pairwise distinct."
                )
            }
            TreeError::NavigatorNotFound { container, path } => {
                write!(
                    f,
                    "route tree error: route '{path}' targets container '{container}', \
                    which is not the container of any enclosing shell."
                )
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Per-branch metadata inside a compiled multi-branch shell.
pub(crate) struct BranchMeta<H: NavHost> {
    pub(crate) container: ContainerId,
    pub(crate) initial_location: Option<String>,
    pub(crate) observers: Vec<H::Observer>,
    pub(crate) restoration_id: Option<String>,
    pub(crate) routes: Vec<RouteId>,
}

/// Compiled route payload, tagged by kind.
pub(crate) enum RouteKind<H: NavHost> {
    Leaf {
        pattern: PathPattern,
        name: Option<String>,
        builder: Option<ContentFn<H>>,
        redirect: Option<RedirectFn>,
        container: Option<ContainerId>,
    },
    SingleShell {
        container: ContainerId,
        builder: ShellContentFn<H>,
        observers: Vec<H::Observer>,
        restoration_scope_id: Option<String>,
    },
    BranchShell {
        builder: BranchShellFn<H>,
        restoration_scope_id: Option<String>,
        branches: Vec<BranchMeta<H>>,
    },
}

/// One arena slot: compiled payload plus tree wiring.
pub(crate) struct RouteEntry<H: NavHost> {
    pub(crate) kind: RouteKind<H>,
    pub(crate) parent: Option<RouteId>,
    pub(crate) children: Vec<RouteId>,
    /// Stable encoding token: route name if present, else the full pattern
    /// path from the root (shells get a structural token).
    pub(crate) token: String,
    /// Full pattern path from the root; shells inherit their parent's.
    pub(crate) full_path: String,
}

/// The immutable, arena-backed route tree.
///
/// Built once from nested [`RouteDef`]s; every pattern is compiled and every
/// invariant checked during [`RouteTree::build`]. Resolution and shell state
/// reference routes by [`RouteId`].
pub struct RouteTree<H: NavHost> {
    arena: Vec<RouteEntry<H>>,
    roots: Vec<RouteId>,
    names: HashMap<String, RouteId>,
}

impl<H: NavHost> fmt::Debug for RouteTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTree")
            .field("routes", &self.arena.len())
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl<H: NavHost> RouteTree<H> {
    /// Compile a definition tree, validating all construction-time
    /// invariants eagerly.
    ///
    /// # Errors
    ///
    /// Any [`TreeError`]; see the variant docs. A tree that builds
    /// successfully cannot produce configuration errors at resolution time.
    pub fn build(defs: Vec<RouteDef<H>>) -> Result<Self, TreeError> {
        let mut tree = Self {
            arena: Vec::new(),
            roots: Vec::new(),
            names: HashMap::new(),
        };

        let mut scope: Vec<ContainerId> = Vec::new();
        let roots = tree.insert_all(defs, None, false, "", &mut scope)?;
        tree.roots = roots;

        info!(
            routes = tree.arena.len(),
            root_routes = tree.roots.len(),
            "route tree built"
        );
        Ok(tree)
    }

    fn insert_all(
        &mut self,
        defs: Vec<RouteDef<H>>,
        parent: Option<RouteId>,
        under_leaf: bool,
        parent_path: &str,
        scope: &mut Vec<ContainerId>,
    ) -> Result<Vec<RouteId>, TreeError> {
        let mut ids = Vec::with_capacity(defs.len());
        for def in defs {
            ids.push(self.insert(def, parent, under_leaf, parent_path, scope)?);
        }
        Ok(ids)
    }

    fn insert(
        &mut self,
        def: RouteDef<H>,
        parent: Option<RouteId>,
        under_leaf: bool,
        parent_path: &str,
        scope: &mut Vec<ContainerId>,
    ) -> Result<RouteId, TreeError> {
        let id = RouteId(self.arena.len());
        // Reserve the slot so children see a stable parent index.
        self.arena.push(RouteEntry {
            kind: RouteKind::BranchShell {
                builder: Box::new(|_, _| unreachable!("placeholder entry")),
                restoration_scope_id: None,
                branches: Vec::new(),
            },
            parent,
            children: Vec::new(),
            token: String::new(),
            full_path: String::new(),
        });

        match def {
            RouteDef::Leaf(route) => {
                if route.path.is_empty() {
                    return Err(TreeError::InvalidPattern {
                        path: route.path,
                        source: PatternError::Empty,
                    });
                }
                let anchor = if under_leaf {
                    if route.path.starts_with('/') {
                        return Err(TreeError::NestedAbsolutePattern { path: route.path });
                    }
                    PatternAnchor::Relative
                } else {
                    if !route.path.starts_with('/') {
                        return Err(TreeError::RootRelativePattern { path: route.path });
                    }
                    PatternAnchor::Absolute
                };

                let pattern =
                    PathPattern::compile(&route.path, anchor).map_err(|source| {
                        TreeError::InvalidPattern {
                            path: route.path.clone(),
                            source,
                        }
                    })?;

                if route.builder.is_none() && route.redirect.is_none() {
                    return Err(TreeError::MissingBuilder { path: route.path });
                }

                if let Some(name) = &route.name {
                    if name.is_empty() {
                        return Err(TreeError::EmptyName { path: route.path });
                    }
                    if self.names.insert(name.clone(), id).is_some() {
                        return Err(TreeError::DuplicateName { name: name.clone() });
                    }
                }

                if let Some(container) = &route.container {
                    // Must name the nearest enclosing shell's container; an
                    // identifier pointing anywhere else is the
                    // construction-time NavigatorNotFound case.
                    if scope.last() != Some(container) {
                        return Err(TreeError::NavigatorNotFound {
                            container: container.clone(),
                            path: route.path,
                        });
                    }
                }

                let full_path = join_paths(parent_path, &route.path);
                let token = route
                    .name
                    .clone()
                    .unwrap_or_else(|| full_path.clone());

                let children =
                    self.insert_all(route.children, Some(id), true, &full_path, scope)?;

                self.arena[id.0] = RouteEntry {
                    kind: RouteKind::Leaf {
                        pattern,
                        name: route.name,
                        builder: route.builder,
                        redirect: route.redirect,
                        container: route.container,
                    },
                    parent,
                    children,
                    token,
                    full_path,
                };
            }
            RouteDef::Single(shell) => {
                scope.push(shell.container.clone());
                let children =
                    self.insert_all(shell.children, Some(id), under_leaf, parent_path, scope);
                scope.pop();
                let children = children?;

                self.arena[id.0] = RouteEntry {
                    kind: RouteKind::SingleShell {
                        container: shell.container,
                        builder: shell.builder,
                        observers: shell.observers,
                        restoration_scope_id: shell.restoration_scope_id,
                    },
                    parent,
                    children,
                    token: format!("shell:{}", id.0),
                    full_path: parent_path.to_string(),
                };
            }
            RouteDef::Branches(shell) => {
                if shell.branches.is_empty() {
                    return Err(TreeError::EmptyBranches);
                }

                let mut seen: Vec<ContainerId> = Vec::new();
                let mut branches = Vec::with_capacity(shell.branches.len());
                let mut children = Vec::new();

                for (index, branch) in shell.branches.into_iter().enumerate() {
                    if branch.routes.is_empty() {
                        return Err(TreeError::EmptyBranch { index });
                    }
                    if seen.contains(&branch.container) {
                        return Err(TreeError::DuplicateContainer {
                            container: branch.container,
                        });
                    }
                    seen.push(branch.container.clone());

                    scope.push(branch.container.clone());
                    let routes =
                        self.insert_all(branch.routes, Some(id), under_leaf, parent_path, scope);
                    scope.pop();
                    let routes = routes?;

                    children.extend_from_slice(&routes);
                    branches.push(BranchMeta {
                        container: branch.container,
                        initial_location: branch.initial_location,
                        observers: branch.observers,
                        restoration_id: branch.restoration_id,
                        routes,
                    });
                }

                self.arena[id.0] = RouteEntry {
                    kind: RouteKind::BranchShell {
                        builder: shell.builder,
                        restoration_scope_id: shell.restoration_scope_id,
                        branches,
                    },
                    parent,
                    children,
                    token: format!("shell:{}", id.0),
                    full_path: parent_path.to_string(),
                };
            }
        }

        Ok(id)
    }

    /// Number of routes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True for a tree with no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Look a route up by its unique name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<RouteId> {
        self.names.get(name).copied()
    }

    /// The stable encoding token for a route: its name if present, else its
    /// full pattern path (shells get a structural `shell:<index>` token).
    #[must_use]
    pub fn route_token(&self, id: RouteId) -> &str {
        &self.arena[id.0].token
    }

    /// Full pattern path from the root, parameters unexpanded
    /// (e.g. `/family/:fid`). Shells report their parent's path.
    #[must_use]
    pub fn full_path(&self, id: RouteId) -> &str {
        &self.arena[id.0].full_path
    }

    /// True when `id` is a shell (single or multi-branch).
    #[must_use]
    pub fn is_shell(&self, id: RouteId) -> bool {
        !matches!(self.arena[id.0].kind, RouteKind::Leaf { .. })
    }

    /// Root-level routes in declaration order.
    #[must_use]
    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    pub(crate) fn entry(&self, id: RouteId) -> &RouteEntry<H> {
        &self.arena[id.0]
    }

    pub(crate) fn children(&self, id: RouteId) -> &[RouteId] {
        &self.arena[id.0].children
    }

    pub(crate) fn parent(&self, id: RouteId) -> Option<RouteId> {
        self.arena[id.0].parent
    }

    pub(crate) fn find_by_token(&self, token: &str) -> Option<RouteId> {
        self.arena
            .iter()
            .position(|e| e.token == token)
            .map(RouteId)
    }
}

/// Join a parent's full pattern path with a child pattern.
fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else if parent.is_empty() || parent == "/" {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}
