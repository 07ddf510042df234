//! # treenav
//!
//! **treenav** is a declarative, tree-structured navigation router for
//! retained-mode UI frameworks. It maps URL-like locations onto a hierarchy
//! of screens, supports nested navigation stacks, and supports multiple
//! independent, state-preserving navigation branches (tab-style navigation)
//! with per-branch history that survives branch switches and process
//! restarts.
//!
//! ## Overview
//!
//! Callers declare an immutable tree of routes: leaf routes carry a path
//! pattern and produce content (or redirect), shell routes wrap their
//! matched descendants in a navigation container, and multi-branch shells
//! partition children into independently-stacked branches. Resolving a
//! location walks that tree, extracts path and query parameters, chases
//! redirects (bounded), and yields a [`MatchList`]: the chain of matched
//! routes the host renders.
//!
//! The library is organized into several key modules:
//!
//! - **[`matcher`]** - Path pattern compilation and prefix matching
//! - **[`route`]** - The route-tree model and construction-time validation
//! - **[`matchlist`]** - Resolved match chains and their restorable encoding
//! - **[`resolver`]** - Location resolution, redirect chasing, supersede guard
//! - **[`shell`]** - Shell resolution and the stateful multi-branch shell
//! - **[`restoration`]** - Scoped access to the host's restoration store
//! - **[`host`]** - The collaborator boundary to the UI framework
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Resolver
//!     participant Tree as RouteTree
//!     participant Shell as StatefulShell
//!
//!     Host->>Resolver: resolve_location("/family/42?tab=1")
//!     Resolver->>Tree: walk(roots, "/family/42")
//!     Tree-->>Resolver: chain [/, family/:fid]
//!     Resolver->>Resolver: chase redirects (bounded)
//!     Resolver-->>Host: MatchList
//!     Host->>Shell: update(tree, list)
//!     Shell->>Shell: diff branch history
//!     alt changed or never built
//!         Shell->>Host: build_container(branch)
//!     else unchanged
//!         Shell->>Shell: reuse container
//!     end
//!     Shell-->>Host: Content
//! ```
//!
//! ### Example
//!
//! ```rust,ignore
//! use treenav::{Branch, BranchShell, ContainerId, Resolver, Route, RouteTree, StatefulShell};
//!
//! let tree = RouteTree::<MyHost>::build(vec![
//!     BranchShell::new(|_ctx, branches| tab_scaffold(branches))
//!         .branch(
//!             Branch::new()
//!                 .container(ContainerId::new("tabA"))
//!                 .route(Route::new("/a").builder(|_| page_a())),
//!         )
//!         .branch(
//!             Branch::new()
//!                 .container(ContainerId::new("tabB"))
//!                 .route(Route::new("/b").builder(|_| page_b())),
//!         )
//!         .into(),
//! ])?;
//!
//! let mut resolver = Resolver::new();
//! let list = resolver.resolve_location(&tree, "/a", None)?;
//! let mut shell = StatefulShell::new(&tree, shell_id, Some(store))?;
//! let content = shell.update(&tree, &list, &mut host)?;
//! ```
//!
//! ## Concurrency model
//!
//! Single-threaded and cooperative: resolution, matching, and shell state
//! transitions run synchronously on the UI thread in response to a location
//! change or a branch switch. Rapid successive navigations are serialized
//! by the host's event queue; the resolver's ticket/commit guard discards a
//! stale result when a newer request has superseded it.

pub mod host;
pub mod location;
pub mod matcher;
pub mod matchlist;
pub mod resolver;
pub mod restoration;
pub mod route;
pub mod shell;

pub use host::{ContainerRequest, NavHost, RouteContext};
pub use location::Location;
pub use matcher::{ParamVec, PathPattern, PatternAnchor, PatternError, MAX_INLINE_PARAMS};
pub use matchlist::{DecodeError, MatchEntry, MatchList, RestorableMatch, RestorableMatchList};
pub use resolver::{
    resolve, resolve_with_redirects, RedirectPolicy, ResolveError, ResolveTicket, Resolver,
    DEFAULT_REDIRECT_LIMIT,
};
pub use restoration::{MemoryStore, RestorationStore, ScopedRestoration, SharedStore};
pub use route::{
    Branch, BranchShell, ContainerId, Route, RouteDef, RouteId, RouteTree, SingleShell, TreeError,
};
pub use shell::{
    active_branch, target_container, BranchContainers, ShellError, SingleShellState, StatefulShell,
};
