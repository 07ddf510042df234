mod common;

use common::{family_tree, init_tracing, TestContainer, TestHost};
use serde_json::json;
use treenav::{
    resolve, resolve_with_redirects, Location, RedirectPolicy, ResolveError, Resolver, Route,
    RouteTree, SingleShell, DEFAULT_REDIRECT_LIMIT,
};

#[test]
fn test_nested_parameter_match() {
    init_tracing();
    let tree = family_tree();
    let list = resolve(&tree, &Location::parse("/family/42"), None).unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(tree.route_token(list.entries()[0].route), "home");
    assert_eq!(tree.route_token(list.entries()[1].route), "family");
    let params = &list.entries()[1].params;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "fid");
    assert_eq!(params[0].1, "42");
    assert_eq!(list.path_params().get("fid").map(String::as_str), Some("42"));
}

#[test]
fn test_root_match_is_single_entry() {
    let tree = family_tree();
    let list = resolve(&tree, &Location::parse("/"), None).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(tree.route_token(list.entries()[0].route), "home");
}

#[test]
fn test_unconsumed_suffix_is_no_match() {
    let tree = family_tree();
    let err = resolve(&tree, &Location::parse("/family/42/junk"), None).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch { .. }));
}

#[test]
fn test_unknown_location_is_no_match() {
    let tree = family_tree();
    let err = resolve(&tree, &Location::parse("/nothing"), None).unwrap_err();
    assert_eq!(
        err,
        ResolveError::NoMatch {
            location: "/nothing".to_string()
        }
    );
}

#[test]
fn test_query_params_carried_on_list() {
    let tree = family_tree();
    let list = resolve(&tree, &Location::parse("/family/42?tab=photos"), None).unwrap();
    assert_eq!(
        list.query_params().get("tab").map(String::as_str),
        Some("photos")
    );
}

#[test]
fn test_declaration_order_precedence() {
    // Static sibling declared before the dynamic catch-all must win.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![Route::new("/")
        .builder(|_| "home".to_string())
        .child(Route::new("family").name("family").builder(|_| "family".to_string()))
        .child(Route::new(":username").name("user").builder(|_| "user".to_string()))
        .into()])
    .unwrap();

    let list = resolve(&tree, &Location::parse("/family"), None).unwrap();
    assert_eq!(tree.route_token(list.entries()[1].route), "family");
    assert!(list.entries()[1].params.is_empty());

    let list = resolve(&tree, &Location::parse("/someone"), None).unwrap();
    assert_eq!(tree.route_token(list.entries()[1].route), "user");
    assert_eq!(list.path_params().get("username").map(String::as_str), Some("someone"));
}

#[test]
fn test_duplicate_param_deeper_capture_wins() {
    // The same parameter name at two chain levels: the merged map keeps the
    // descendant's capture, while each entry keeps its own.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![Route::new("/x/:id")
        .builder(|_| "outer".to_string())
        .child(Route::new(":id").builder(|_| "inner".to_string()))
        .into()])
    .unwrap();

    let list = resolve(&tree, &Location::parse("/x/1/2"), None).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.entries()[0].params[0].1, "1");
    assert_eq!(list.entries()[1].params[0].1, "2");
    assert_eq!(list.path_params().get("id").map(String::as_str), Some("2"));
}

#[test]
fn test_shell_subtree_failure_falls_through_to_sibling() {
    // A shell consumes no path, so when nothing inside it matches the shell
    // is unwound and the sibling declared after it gets its turn.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        SingleShell::new(|_, c: &TestContainer| format!("shell({})", c.container))
            .child(Route::new("/a").builder(|_| "a".to_string()))
            .into(),
        Route::new("/other").name("other").builder(|_| "other".to_string()).into(),
    ])
    .unwrap();

    let list = resolve(&tree, &Location::parse("/other"), None).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(tree.route_token(list.entries()[0].route), "other");
    assert!(list.entries().iter().all(|e| !tree.is_shell(e.route)));
}

#[test]
fn test_redirect_followed() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/old").redirect(|_| Some("/new".to_string())).into(),
        Route::new("/new").name("new").builder(|_| "new".to_string()).into(),
    ])
    .unwrap();

    let list = resolve_with_redirects(&tree, "/old", None, RedirectPolicy::default()).unwrap();
    assert_eq!(tree.route_token(list.deepest().unwrap().route), "new");
    assert_eq!(list.location().path(), "/new");
}

#[test]
fn test_parent_redirect_wins_over_child() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/guarded")
            .redirect(|_| Some("/root-target".to_string()))
            .builder(|_| "guarded".to_string())
            .child(
                Route::new("inner")
                    .redirect(|_| Some("/child-target".to_string()))
                    .builder(|_| "inner".to_string()),
            )
            .into(),
        Route::new("/root-target").name("root-target").builder(|_| "rt".to_string()).into(),
        Route::new("/child-target").name("child-target").builder(|_| "ct".to_string()).into(),
    ])
    .unwrap();

    let list =
        resolve_with_redirects(&tree, "/guarded/inner", None, RedirectPolicy::default()).unwrap();
    assert_eq!(tree.route_token(list.deepest().unwrap().route), "root-target");
}

#[test]
fn test_redirect_loop_bounded() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/ping").redirect(|_| Some("/pong".to_string())).into(),
        Route::new("/pong").redirect(|_| Some("/ping".to_string())).into(),
    ])
    .unwrap();

    let err = resolve_with_redirects(&tree, "/ping", None, RedirectPolicy::default()).unwrap_err();
    assert_eq!(
        err,
        ResolveError::RedirectLoop {
            location: "/ping".to_string(),
            limit: DEFAULT_REDIRECT_LIMIT,
        }
    );
}

#[test]
fn test_redirect_limit_configurable() {
    // A three-hop chain passes with a generous limit and fails with a
    // tighter one.
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/one").redirect(|_| Some("/two".to_string())).into(),
        Route::new("/two").redirect(|_| Some("/three".to_string())).into(),
        Route::new("/three").redirect(|_| Some("/final".to_string())).into(),
        Route::new("/final").name("final").builder(|_| "f".to_string()).into(),
    ])
    .unwrap();

    let list =
        resolve_with_redirects(&tree, "/one", None, RedirectPolicy { max_redirects: 3 }).unwrap();
    assert_eq!(tree.route_token(list.deepest().unwrap().route), "final");

    let err = resolve_with_redirects(&tree, "/one", None, RedirectPolicy { max_redirects: 2 })
        .unwrap_err();
    assert!(matches!(err, ResolveError::RedirectLoop { limit: 2, .. }));
}

#[test]
fn test_redirect_sees_extra_payload() {
    let tree: RouteTree<TestHost> = RouteTree::build(vec![
        Route::new("/maybe")
            .redirect(|ctx| {
                ctx.extra
                    .and_then(|v| v.get("bounce"))
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
                    .then(|| "/elsewhere".to_string())
            })
            .builder(|_| "maybe".to_string())
            .into(),
        Route::new("/elsewhere").name("elsewhere").builder(|_| "e".to_string()).into(),
    ])
    .unwrap();

    let stay = resolve_with_redirects(&tree, "/maybe", None, RedirectPolicy::default()).unwrap();
    assert_eq!(stay.location().path(), "/maybe");

    let moved = resolve_with_redirects(
        &tree,
        "/maybe",
        Some(json!({"bounce": true})),
        RedirectPolicy::default(),
    )
    .unwrap();
    assert_eq!(moved.location().path(), "/elsewhere");
}

#[test]
fn test_superseded_resolution_is_discarded() {
    let tree = family_tree();
    let mut resolver = Resolver::new();

    let stale = resolver.begin("/family/1");
    let fresh = resolver.begin("/family/2");

    let stale_list = resolver.run(&tree, &stale, None).unwrap();
    let fresh_list = resolver.run(&tree, &fresh, None).unwrap();

    assert!(resolver.commit(&stale, stale_list).is_none());
    let committed = resolver.commit(&fresh, fresh_list).unwrap();
    assert_eq!(committed.path_params().get("fid").map(String::as_str), Some("2"));
}

#[test]
fn test_resolve_location_front_end() {
    let tree = family_tree();
    let mut resolver = Resolver::new();
    let list = resolver
        .resolve_location(&tree, "/family/7?x=1", None)
        .unwrap();
    assert_eq!(list.path_params().get("fid").map(String::as_str), Some("7"));
    assert_eq!(list.query_params().get("x").map(String::as_str), Some("1"));
}
