mod common;

use common::{
    family_tree, init_tracing, root_shell, single_shell_tree, tabs_tree, TestContainer, TestHost,
};
use serde_json::json;
use treenav::{
    active_branch, resolve, target_container, Branch, BranchShell, ContainerId, Location, Route,
    RouteTree, ShellError, SingleShell, SingleShellState, StatefulShell,
};

#[test]
fn test_active_branch_follows_location() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);

    let list = resolve(&tree, &Location::parse("/a"), None).unwrap();
    assert_eq!(active_branch(&tree, shell, &list, 0).unwrap(), 0);

    let list = resolve(&tree, &Location::parse("/b"), None).unwrap();
    assert_eq!(active_branch(&tree, shell, &list, 0).unwrap(), 1);
}

#[test]
fn test_target_container_of_branch_child() {
    let tree = tabs_tree();
    let list = resolve(&tree, &Location::parse("/b"), None).unwrap();
    assert_eq!(target_container(&tree, &list, 0).unwrap(), ContainerId::new("tabB"));
}

#[test]
fn test_target_container_requires_descendant() {
    let tree = tabs_tree();
    let list = resolve(&tree, &Location::parse("/a"), None).unwrap();
    // Position 1 is the leaf itself: nothing follows it.
    assert_eq!(target_container(&tree, &list, 1).unwrap_err(), ShellError::NoTargetRoute);
}

#[test]
fn test_explicit_target_container_resolved() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![SingleShell::new(
        |_, c: &TestContainer| format!("shell({})", c.container),
    )
    .container(ContainerId::new("main"))
    .child(
        Route::new("/a")
            .container(ContainerId::new("main"))
            .builder(|_| "a".to_string()),
    )
    .into()])
    .unwrap();

    let list = resolve(&tree, &Location::parse("/a"), None).unwrap();
    assert_eq!(target_container(&tree, &list, 0).unwrap(), ContainerId::new("main"));
}

#[test]
fn test_single_shell_container_built_once() {
    init_tracing();
    let tree = single_shell_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = SingleShellState::new(&tree, shell).unwrap();

    let list = resolve(&tree, &Location::parse("/inner"), None).unwrap();
    let content = state.update(&tree, &list, &mut host).unwrap();
    assert_eq!(content, "shell(main)");
    assert_eq!(host.build_count(), 1);
    assert_eq!(
        host.builds[0].restoration_scope_id.as_deref(),
        Some("main-shell")
    );

    // Second pass reuses the container.
    let again = resolve(&tree, &Location::parse("/inner"), None).unwrap();
    state.update(&tree, &again, &mut host).unwrap();
    assert_eq!(host.build_count(), 1);
    assert_eq!(state.container().map(|c| c.serial), Some(1));
}

#[test]
fn test_wrong_shell_kind_rejected() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    assert_eq!(
        SingleShellState::new(&tree, shell).unwrap_err(),
        ShellError::WrongShellKind
    );

    let family = family_tree();
    let home = family.find_by_name("home").unwrap();
    assert_eq!(
        StatefulShell::new(&family, home, None).unwrap_err(),
        ShellError::WrongShellKind
    );
}

#[test]
fn test_branch_rebuild_only_on_change() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    let content = state.update(&tree, &at_a, &mut host).unwrap();
    assert_eq!(content, "tabs(active=0)");
    assert_eq!(host.build_count(), 1);
    let first_serial = state.branch_container(0).map(|c| c.serial);

    // Same location again: no rebuild.
    let same = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &same, &mut host).unwrap();
    assert_eq!(host.build_count(), 1);
    assert_eq!(state.branch_container(0).map(|c| c.serial), first_serial);
}

#[test]
fn test_untouched_branch_reused_across_switches() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    // Visit tab A, then tab B, then return to A without navigating inside A.
    let at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &at_a, &mut host).unwrap();
    let a_serial = state.branch_container(0).map(|c| c.serial);

    let at_b = resolve(&tree, &Location::parse("/b"), None).unwrap();
    let content = state.update(&tree, &at_b, &mut host).unwrap();
    assert_eq!(content, "tabs(active=1)");
    assert_eq!(host.build_count(), 2);

    let back_at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &back_at_a, &mut host).unwrap();
    // The untouched branch keeps its container instance.
    assert_eq!(host.build_count(), 2);
    assert_eq!(state.branch_container(0).map(|c| c.serial), a_serial);
}

#[test]
fn test_branch_rebuilds_on_inner_navigation() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![BranchShell::new(|_, b| {
        format!("tabs(active={})", b.active_index())
    })
    .branch(
        Branch::new().container(ContainerId::new("tabA")).route(
            Route::new("/a")
                .builder(|_| "a".to_string())
                .child(Route::new("deep").builder(|_| "deep".to_string())),
        ),
    )
    .branch(
        Branch::new()
            .container(ContainerId::new("tabB"))
            .route(Route::new("/b").builder(|_| "b".to_string())),
    )
    .into()])
    .unwrap();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &at_a, &mut host).unwrap();
    let deeper = resolve(&tree, &Location::parse("/a/deep"), None).unwrap();
    state.update(&tree, &deeper, &mut host).unwrap();
    // Navigation inside the branch changes its match list: rebuild.
    assert_eq!(host.build_count(), 2);
}

#[test]
fn test_switch_to_unvisited_branch_uses_first_leaf() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &at_a, &mut host).unwrap();

    state.switch_branch(1, &tree, &mut host).unwrap();
    assert_eq!(host.last_navigation(), Some(&("/b".to_string(), None)));
}

#[test]
fn test_switch_back_restores_exact_location() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let at_a = resolve(&tree, &Location::parse("/a"), None).unwrap();
    state.update(&tree, &at_a, &mut host).unwrap();

    // Host follows the switch to tab B.
    state.switch_branch(1, &tree, &mut host).unwrap();
    let at_b = resolve(&tree, &Location::parse("/b"), None).unwrap();
    state.update(&tree, &at_b, &mut host).unwrap();

    state.switch_branch(0, &tree, &mut host).unwrap();
    assert_eq!(host.last_navigation(), Some(&("/a".to_string(), None)));
}

#[test]
fn test_switch_restores_extra_payload() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let at_a = resolve(
        &tree,
        &Location::parse("/a?tab=x"),
        Some(json!({"scroll": 10})),
    )
    .unwrap();
    state.update(&tree, &at_a, &mut host).unwrap();

    let at_b = resolve(&tree, &Location::parse("/b"), None).unwrap();
    state.update(&tree, &at_b, &mut host).unwrap();

    state.switch_branch(0, &tree, &mut host).unwrap();
    assert_eq!(
        host.last_navigation(),
        Some(&("/a?tab=x".to_string(), Some(json!({"scroll": 10}))))
    );
}

#[test]
fn test_switch_prefers_initial_location() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![BranchShell::new(|_, b| {
        format!("tabs(active={})", b.active_index())
    })
    .branch(
        Branch::new()
            .container(ContainerId::new("tabA"))
            .route(Route::new("/a").builder(|_| "a".to_string())),
    )
    .branch(
        Branch::new()
            .container(ContainerId::new("tabB"))
            .initial_location("/b/settings")
            .route(
                Route::new("/b")
                    .builder(|_| "b".to_string())
                    .child(Route::new("settings").builder(|_| "settings".to_string())),
            ),
    )
    .into()])
    .unwrap();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    state.switch_branch(1, &tree, &mut host).unwrap();
    assert_eq!(host.last_navigation(), Some(&("/b/settings".to_string(), None)));
}

#[test]
fn test_switch_index_out_of_range() {
    let tree = tabs_tree();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    assert_eq!(
        state.switch_branch(7, &tree, &mut host).unwrap_err(),
        ShellError::IndexOutOfRange { index: 7, len: 2 }
    );
}

#[test]
fn test_switch_to_leafless_branch_fails() {
    // Branch B holds only a childless shell: no leaf to derive a default
    // location from, and no initial location either.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![BranchShell::new(|_, b| {
        format!("tabs(active={})", b.active_index())
    })
    .branch(
        Branch::new()
            .container(ContainerId::new("tabA"))
            .route(Route::new("/a").builder(|_| "a".to_string())),
    )
    .branch(
        Branch::new()
            .container(ContainerId::new("tabB"))
            .route(SingleShell::new(|_, c: &TestContainer| {
                format!("shell({})", c.container)
            })),
    )
    .into()])
    .unwrap();
    let shell = root_shell(&tree);
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    assert_eq!(
        state.switch_branch(1, &tree, &mut host).unwrap_err(),
        ShellError::NoDefaultRoute { index: 1 }
    );
}

#[test]
fn test_shell_not_in_chain() {
    // The shell sits beside a plain route; a chain matched through the
    // plain route does not contain the shell.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/standalone").builder(|_| "standalone".to_string()).into(),
        BranchShell::new(|_, b| format!("tabs(active={})", b.active_index()))
            .branch(
                Branch::new()
                    .container(ContainerId::new("tabA"))
                    .route(Route::new("/a").builder(|_| "a".to_string())),
            )
            .into(),
    ])
    .unwrap();
    let shell = tree.roots()[1];
    let mut host = TestHost::new();
    let mut state = StatefulShell::new(&tree, shell, None).unwrap();

    let outside = resolve(&tree, &Location::parse("/standalone"), None).unwrap();
    assert_eq!(
        state.update(&tree, &outside, &mut host).unwrap_err(),
        ShellError::ShellNotInChain
    );
}
