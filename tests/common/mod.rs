//! Shared fixtures: a recording test host and small route trees.

// Not every test binary exercises every fixture.
#![allow(dead_code)]

use serde_json::Value;
use treenav::{
    Branch, BranchShell, ContainerId, ContainerRequest, NavHost, Route, RouteDef, RouteId,
    RouteTree, SingleShell,
};

/// Install a test subscriber once so `RUST_LOG` works under `cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Container handle carrying a build serial so tests can assert identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContainer {
    pub serial: u32,
    pub container: ContainerId,
}

/// Recording host: counts container builds and captures navigations.
#[derive(Debug, Default)]
pub struct TestHost {
    pub builds: Vec<ContainerRequest<&'static str>>,
    pub navigations: Vec<(String, Option<Value>)>,
    next_serial: u32,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_count(&self) -> usize {
        self.builds.len()
    }

    pub fn last_navigation(&self) -> Option<&(String, Option<Value>)> {
        self.navigations.last()
    }
}

impl NavHost for TestHost {
    type Content = String;
    type Container = TestContainer;
    type Observer = &'static str;

    fn build_container(&mut self, req: ContainerRequest<&'static str>) -> TestContainer {
        self.next_serial += 1;
        let container = TestContainer {
            serial: self.next_serial,
            container: req.container.clone(),
        };
        self.builds.push(req);
        container
    }

    fn resolve_and_navigate(&mut self, location: &str, extra: Option<Value>) {
        self.navigations.push((location.to_string(), extra));
    }
}

/// `/` (home) with child `family/:fid`, the nested-parameter example tree.
pub fn family_tree() -> RouteTree<TestHost> {
    RouteTree::build(vec![Route::new("/")
        .name("home")
        .builder(|_| "home".to_string())
        .child(
            Route::new("family/:fid")
                .name("family")
                .builder(|ctx| format!("family {}", ctx.path_param("fid").unwrap_or(""))),
        )
        .into()])
    .expect("family tree builds")
}

/// Two-tab shell: tabA owns `/a`, tabB owns `/b`. Neither branch declares an
/// initial location.
pub fn tabs_tree() -> RouteTree<TestHost> {
    RouteTree::build(vec![BranchShell::new(|_, branches| {
        format!("tabs(active={})", branches.active_index())
    })
    .restoration_scope_id("tabs")
    .branch(
        Branch::new()
            .container(ContainerId::new("tabA"))
            .route(Route::new("/a").builder(|_| "page a".to_string())),
    )
    .branch(
        Branch::new()
            .container(ContainerId::new("tabB"))
            .route(Route::new("/b").builder(|_| "page b".to_string())),
    )
    .into()])
    .expect("tabs tree builds")
}

/// The shell's route id in a tree whose first root is the shell.
pub fn root_shell(tree: &RouteTree<TestHost>) -> RouteId {
    tree.roots()[0]
}

/// Single-container shell wrapping `/inner`.
pub fn single_shell_tree() -> RouteTree<TestHost> {
    RouteTree::build(vec![SingleShell::new(|_, container: &TestContainer| {
        format!("shell({})", container.container)
    })
    .container(ContainerId::new("main"))
    .restoration_scope_id("main-shell")
    .child(Route::new("/inner").builder(|_| "inner".to_string()))
    .into()])
    .expect("single shell tree builds")
}

/// Convenience for building defs in tests that expect construction errors.
pub fn defs(def: impl Into<RouteDef<TestHost>>) -> Vec<RouteDef<TestHost>> {
    vec![def.into()]
}
