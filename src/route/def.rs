use super::ContainerId;
use crate::host::{NavHost, RouteContext};
use crate::shell::BranchContainers;

/// Leaf content builder: receives resolved routing state, returns the
/// framework's content type. The core never inspects the return value.
pub type ContentFn<H> = Box<dyn Fn(&RouteContext<'_>) -> <H as NavHost>::Content>;

/// Route-level redirect: `Some(location)` sends resolution elsewhere,
/// `None` lets the match stand. The navigation payload is available through
/// [`RouteContext::extra`](crate::host::RouteContext).
pub type RedirectFn = Box<dyn Fn(&RouteContext<'_>) -> Option<String>>;

/// Single-container shell builder: receives the rendered child container.
pub type ShellContentFn<H> =
    Box<dyn Fn(&RouteContext<'_>, &<H as NavHost>::Container) -> <H as NavHost>::Content>;

/// Multi-branch shell builder: receives all branch containers plus the
/// active index, so the shell can multiplex them (e.g., a tab scaffold).
pub type BranchShellFn<H> =
    Box<dyn Fn(&RouteContext<'_>, BranchContainers<'_, H>) -> <H as NavHost>::Content>;

/// A node in the declarative route definition tree.
///
/// Built from [`Route`], [`SingleShell`], and [`BranchShell`] via `From`,
/// then compiled by [`super::RouteTree::build`].
pub enum RouteDef<H: NavHost> {
    /// Content-producing (or redirecting) route with a path pattern
    Leaf(Route<H>),
    /// Shell wrapping all children in one navigation container
    Single(SingleShell<H>),
    /// Shell partitioning children into independent branches
    Branches(BranchShell<H>),
}

/// Definition of a leaf route.
///
/// At least one of [`Route::builder`] and [`Route::redirect`] must be set;
/// [`super::RouteTree::build`] rejects a route with neither.
pub struct Route<H: NavHost> {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) builder: Option<ContentFn<H>>,
    pub(crate) redirect: Option<RedirectFn>,
    pub(crate) container: Option<ContainerId>,
    pub(crate) children: Vec<RouteDef<H>>,
}

impl<H: NavHost> Route<H> {
    /// A route matching `path`: absolute (leading `/`) at the root level,
    /// relative below another leaf.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            builder: None,
            redirect: None,
            container: None,
            children: Vec::new(),
        }
    }

    /// Unique name for lookup and stable restoration tokens.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Content builder invoked when this route is the deepest match.
    #[must_use]
    pub fn builder(
        mut self,
        f: impl Fn(&RouteContext<'_>) -> H::Content + 'static,
    ) -> Self {
        self.builder = Some(Box::new(f));
        self
    }

    /// Redirect evaluated on every resolution that matches this route.
    #[must_use]
    pub fn redirect(
        mut self,
        f: impl Fn(&RouteContext<'_>) -> Option<String> + 'static,
    ) -> Self {
        self.redirect = Some(Box::new(f));
        self
    }

    /// Target an ancestor shell's container explicitly instead of the
    /// immediately enclosing one.
    #[must_use]
    pub fn container(mut self, id: ContainerId) -> Self {
        self.container = Some(id);
        self
    }

    /// Append a child route, matched against the suffix this route leaves.
    #[must_use]
    pub fn child(mut self, child: impl Into<RouteDef<H>>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Definition of a shell wrapping all children in one container.
pub struct SingleShell<H: NavHost> {
    pub(crate) container: ContainerId,
    pub(crate) builder: ShellContentFn<H>,
    pub(crate) observers: Vec<H::Observer>,
    pub(crate) restoration_scope_id: Option<String>,
    pub(crate) children: Vec<RouteDef<H>>,
}

impl<H: NavHost> SingleShell<H> {
    /// A shell whose builder wraps the rendered child container.
    ///
    /// The container identifier defaults to a generated one; assign an
    /// explicit [`ContainerId`] when descendants need to target it.
    #[must_use]
    pub fn new(
        f: impl Fn(&RouteContext<'_>, &H::Container) -> H::Content + 'static,
    ) -> Self {
        Self {
            container: ContainerId::generate(),
            builder: Box::new(f),
            observers: Vec::new(),
            restoration_scope_id: None,
            children: Vec::new(),
        }
    }

    /// Explicit container identifier.
    #[must_use]
    pub fn container(mut self, id: ContainerId) -> Self {
        self.container = id;
        self
    }

    /// Attach a navigation observer to the shell's container.
    #[must_use]
    pub fn observer(mut self, observer: H::Observer) -> Self {
        self.observers.push(observer);
        self
    }

    /// Restoration scope handed to the host when the container is built.
    #[must_use]
    pub fn restoration_scope_id(mut self, id: impl Into<String>) -> Self {
        self.restoration_scope_id = Some(id.into());
        self
    }

    /// Append a child route.
    #[must_use]
    pub fn child(mut self, child: impl Into<RouteDef<H>>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Definition of a multi-branch shell.
pub struct BranchShell<H: NavHost> {
    pub(crate) builder: BranchShellFn<H>,
    pub(crate) restoration_scope_id: Option<String>,
    pub(crate) branches: Vec<Branch<H>>,
}

impl<H: NavHost> BranchShell<H> {
    /// A shell multiplexing independently-stacked branches.
    #[must_use]
    pub fn new(
        f: impl Fn(&RouteContext<'_>, BranchContainers<'_, H>) -> H::Content + 'static,
    ) -> Self {
        Self {
            builder: Box::new(f),
            restoration_scope_id: None,
            branches: Vec::new(),
        }
    }

    /// Restoration scope prefix for per-branch persisted history.
    #[must_use]
    pub fn restoration_scope_id(mut self, id: impl Into<String>) -> Self {
        self.restoration_scope_id = Some(id.into());
        self
    }

    /// Append a branch. Branch order defines switch indices.
    #[must_use]
    pub fn branch(mut self, branch: Branch<H>) -> Self {
        self.branches.push(branch);
        self
    }
}

/// One independently-persisted navigation branch of a [`BranchShell`].
pub struct Branch<H: NavHost> {
    pub(crate) container: ContainerId,
    pub(crate) initial_location: Option<String>,
    pub(crate) observers: Vec<H::Observer>,
    pub(crate) restoration_id: Option<String>,
    pub(crate) routes: Vec<RouteDef<H>>,
}

impl<H: NavHost> Branch<H> {
    /// A branch with a generated container identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: ContainerId::generate(),
            initial_location: None,
            observers: Vec::new(),
            restoration_id: None,
            routes: Vec::new(),
        }
    }

    /// Explicit container identifier for this branch's navigation stack.
    #[must_use]
    pub fn container(mut self, id: ContainerId) -> Self {
        self.container = id;
        self
    }

    /// Location to navigate to on first visit, before any history exists.
    #[must_use]
    pub fn initial_location(mut self, location: impl Into<String>) -> Self {
        self.initial_location = Some(location.into());
        self
    }

    /// Attach a navigation observer to the branch's container.
    #[must_use]
    pub fn observer(mut self, observer: H::Observer) -> Self {
        self.observers.push(observer);
        self
    }

    /// Explicit restoration key for this branch's persisted history.
    /// Without one, a structural key derived from the shell's arena position
    /// is used.
    #[must_use]
    pub fn restoration_id(mut self, id: impl Into<String>) -> Self {
        self.restoration_id = Some(id.into());
        self
    }

    /// Append a route to the branch's route list.
    #[must_use]
    pub fn route(mut self, route: impl Into<RouteDef<H>>) -> Self {
        self.routes.push(route.into());
        self
    }
}

impl<H: NavHost> Default for Branch<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NavHost> From<Route<H>> for RouteDef<H> {
    fn from(r: Route<H>) -> Self {
        RouteDef::Leaf(r)
    }
}

impl<H: NavHost> From<SingleShell<H>> for RouteDef<H> {
    fn from(s: SingleShell<H>) -> Self {
        RouteDef::Single(s)
    }
}

impl<H: NavHost> From<BranchShell<H>> for RouteDef<H> {
    fn from(s: BranchShell<H>) -> Self {
        RouteDef::Branches(s)
    }
}
