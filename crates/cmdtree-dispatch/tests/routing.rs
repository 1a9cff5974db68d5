//! Integration tests for routing through command trees.
//!
//! Handlers in these tests return a tag naming themselves plus the arguments
//! they received, so each assertion checks both which handler ran and what it
//! was given.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cmdtree_dispatch::{CommandTree, DispatchError, Entry, Handler};

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tag(name: &'static str) -> Handler<String> {
    Handler::plain(move |a: &[String]| Ok::<_, anyhow::Error>(format!("{} {:?}", name, a)))
}

fn gated(name: &'static str, min_args: usize) -> Handler<String> {
    Handler::gated(
        min_args,
        move |a: &[String]| Ok::<_, anyhow::Error>(format!("{} {:?}", name, a)),
        move |a: &[String]| Ok::<_, anyhow::Error>(format!("{}-help {:?}", name, a)),
    )
}

fn expected(name: &str, items: &[&str]) -> String {
    format!("{} {:?}", name, args(items))
}

fn sample_tree() -> CommandTree<String> {
    CommandTree::new(tag("root"))
        .subcommand(
            "os",
            CommandTree::new(tag("os"))
                .subcommand("exist", tag("exist"))
                .subcommand("closed", tag("closed")),
        )
        .subcommand("http", tag("http"))
        .subcommand("io", tag("root"))
        .subcommand("bad", Entry::invalid("citizen"))
}

// ============================================================================
// Exact-match routing
// ============================================================================

#[test]
fn routes_to_matching_subcommand() {
    let tree = CommandTree::new(tag("root"))
        .subcommand("a", tag("h1"))
        .subcommand("b", tag("h2"));

    assert_eq!(tree.dispatch(&args(&["a", "x"])).unwrap(), expected("h1", &["x"]));
    assert_eq!(
        tree.dispatch(&args(&["b", "y", "z"])).unwrap(),
        expected("h2", &["y", "z"])
    );
}

#[test]
fn match_is_exact_and_case_sensitive() {
    let tree = CommandTree::new(tag("root")).subcommand("a", tag("h1"));

    assert_eq!(tree.dispatch(&args(&["A"])).unwrap(), expected("root", &["A"]));
    assert_eq!(tree.dispatch(&args(&["ab"])).unwrap(), expected("root", &["ab"]));
}

// ============================================================================
// Fallthrough
// ============================================================================

#[test]
fn unknown_subcommand_runs_root_with_unmodified_args() {
    let tree = CommandTree::new(tag("root"))
        .subcommand("a", tag("h1"))
        .subcommand("b", tag("h2"));

    assert_eq!(tree.dispatch(&args(&["c"])).unwrap(), expected("root", &["c"]));
}

#[test]
fn empty_args_run_root() {
    let tree = sample_tree();
    assert_eq!(tree.dispatch(&[]).unwrap(), expected("root", &[]));
}

#[test]
fn nested_fallthrough_keeps_consumed_prefix_removed() {
    let tree = sample_tree();
    assert_eq!(
        tree.dispatch(&args(&["os", "beep", "boop"])).unwrap(),
        expected("os", &["beep", "boop"])
    );
}

#[test]
fn table_of_invocations() {
    let tree = sample_tree();
    let table = [
        ("", expected("root", &[])),
        ("foo", expected("root", &["foo"])),
        ("os exist", expected("exist", &[])),
        ("os exist foo bar baz", expected("exist", &["foo", "bar", "baz"])),
        ("os closed !", expected("closed", &["!"])),
        ("os beep boop", expected("os", &["beep", "boop"])),
        ("http get", expected("http", &["get"])),
    ];

    for (line, want) in table {
        let got = tree.dispatch_from(line.split_whitespace()).unwrap();
        assert_eq!(got, want, "dispatching {:?}", line);
    }
}

// ============================================================================
// Minimum-argument gating
// ============================================================================

#[test]
fn gate_runs_fallback_below_minimum() {
    let tree = CommandTree::new(gated("cmd", 2));

    assert_eq!(tree.dispatch(&[]).unwrap(), expected("cmd-help", &[]));
    assert_eq!(tree.dispatch(&args(&["x"])).unwrap(), expected("cmd-help", &["x"]));
}

#[test]
fn gate_runs_invoke_at_minimum_and_above() {
    let tree = CommandTree::new(gated("cmd", 2));

    assert_eq!(
        tree.dispatch(&args(&["x", "y"])).unwrap(),
        expected("cmd", &["x", "y"])
    );
    assert_eq!(
        tree.dispatch(&args(&["x", "y", "z"])).unwrap(),
        expected("cmd", &["x", "y", "z"])
    );
}

#[test]
fn zero_minimum_always_defers_to_fallback() {
    let tree = CommandTree::new(gated("router", 0)).subcommand("sub", tag("sub"));

    assert_eq!(tree.dispatch(&[]).unwrap(), expected("router-help", &[]));
    assert_eq!(
        tree.dispatch(&args(&["nope", "x"])).unwrap(),
        expected("router-help", &["nope", "x"])
    );
    assert_eq!(tree.dispatch(&args(&["sub", "x"])).unwrap(), expected("sub", &["x"]));
}

#[test]
fn gated_subcommand_entry() {
    let tree = CommandTree::new(tag("root")).subcommand("get", gated("get", 1));

    assert_eq!(tree.dispatch(&args(&["get"])).unwrap(), expected("get-help", &[]));
    assert_eq!(
        tree.dispatch(&args(&["get", "key"])).unwrap(),
        expected("get", &["key"])
    );
}

// ============================================================================
// Gate interacting with descent
// ============================================================================

#[test]
fn subcommand_token_follows_reserved_prefix() {
    let tree = CommandTree::new(gated("node", 1)).subcommand("sub", tag("sub"));

    assert_eq!(
        tree.dispatch(&args(&["pre", "sub", "rest"])).unwrap(),
        expected("sub", &["pre", "rest"])
    );
}

#[test]
fn token_inside_prefix_is_not_matched() {
    let tree = CommandTree::new(gated("node", 1)).subcommand("sub", tag("sub"));

    // "sub" sits in the reserved slot, so the node's own handler runs
    assert_eq!(
        tree.dispatch(&args(&["sub", "other"])).unwrap(),
        expected("node", &["sub", "other"])
    );
}

#[test]
fn args_not_longer_than_gate_skip_descent() {
    let tree = CommandTree::new(gated("node", 2)).subcommand("sub", tag("sub"));

    assert_eq!(
        tree.dispatch(&args(&["a", "sub"])).unwrap(),
        expected("node", &["a", "sub"])
    );
}

// ============================================================================
// Nested trees
// ============================================================================

#[test]
fn three_levels_resolve_to_deepest_leaf() {
    let tree = CommandTree::new(tag("root")).subcommand(
        "one",
        CommandTree::new(tag("one")).subcommand(
            "two",
            CommandTree::new(tag("two")).subcommand("three", tag("three")),
        ),
    );

    assert_eq!(
        tree.dispatch(&args(&["one", "two", "three", "x"])).unwrap(),
        expected("three", &["x"])
    );
    assert_eq!(
        tree.dispatch(&args(&["one", "two", "x"])).unwrap(),
        expected("two", &["x"])
    );
    assert_eq!(
        tree.dispatch(&args(&["one", "x", "two"])).unwrap(),
        expected("one", &["x", "two"])
    );
}

#[test]
fn nested_handler_as_root_handler() {
    let inner = CommandTree::new(tag("inner")).subcommand("deep", tag("deep"));
    let tree = CommandTree::new(Handler::nested(inner)).subcommand("top", tag("top"));

    assert_eq!(tree.dispatch(&args(&["top"])).unwrap(), expected("top", &[]));
    assert_eq!(tree.dispatch(&args(&["deep", "x"])).unwrap(), expected("deep", &["x"]));
    assert_eq!(tree.dispatch(&args(&["other"])).unwrap(), expected("inner", &["other"]));
}

// ============================================================================
// Invalid entries
// ============================================================================

#[test]
fn invalid_entry_reports_args_without_panicking() {
    let tree = sample_tree();
    let err = tree.dispatch(&args(&["bad", "times"])).unwrap_err();

    assert!(err.to_string().contains("invalid handler"));
    assert!(err.to_string().contains("times"));
    match err.downcast_ref::<DispatchError>() {
        Some(DispatchError::InvalidHandler { args, value }) => {
            assert_eq!(args, &["times"]);
            assert_eq!(value, "citizen");
        }
        None => panic!("expected DispatchError"),
    }
}

#[test]
fn invalid_entry_is_harmless_until_matched() {
    let tree = sample_tree();
    assert!(tree.dispatch(&args(&["http"])).is_ok());
}

// ============================================================================
// Error pass-through
// ============================================================================

#[test]
fn handler_errors_pass_through_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    let tree: CommandTree<()> = CommandTree::new(tag_unit()).subcommand(
        "write",
        Handler::plain(|_a: &[String]| Err::<(), _>(DiskFull)),
    );

    let err = tree.dispatch(&args(&["write"])).unwrap_err();
    assert_eq!(err.to_string(), "disk full");
    assert!(err.downcast_ref::<DiskFull>().is_some());
    assert!(err.downcast_ref::<DispatchError>().is_none());
}

fn tag_unit() -> Handler<()> {
    Handler::plain(|_a: &[String]| Ok::<_, anyhow::Error>(()))
}

// ============================================================================
// Tree immutability
// ============================================================================

#[test]
fn repeated_dispatch_is_stable() {
    let tree = sample_tree();
    let input = args(&["os", "exist", "foo"]);

    let first = tree.dispatch(&input).unwrap();
    for _ in 0..5 {
        assert_eq!(tree.dispatch(&input).unwrap(), first);
    }
    assert_eq!(input, args(&["os", "exist", "foo"]));
}

#[test]
fn caller_args_are_not_modified() {
    let tree = CommandTree::new(gated("node", 1)).subcommand("sub", tag("sub"));
    let input = args(&["pre", "sub", "rest"]);

    tree.dispatch(&input).unwrap();
    assert_eq!(input, args(&["pre", "sub", "rest"]));
}

#[test]
fn concurrent_dispatch_on_shared_tree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let tree = CommandTree::new(tag("root")).subcommand(
        "count",
        Handler::plain(move |a: &[String]| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(format!("count {:?}", a))
        }),
    );

    std::thread::scope(|s| {
        for i in 0..8 {
            let tree = &tree;
            s.spawn(move || {
                let n = i.to_string();
                let got = tree.dispatch(&args(&["count", n.as_str()])).unwrap();
                assert_eq!(got, expected("count", &[n.as_str()]));
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 8);
}
