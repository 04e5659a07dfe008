//! Locator behavior over synthetic window graphs.
//!
//! Each test builds a frame tree, runs the locator from the content window on
//! a virtual clock, and checks which `API` was found and how long it took.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;

use scorm_bridge_core::{LocateError, MAX_PARENT_HOPS, RetryPolicy, locate, locate_once};
use scorm_bridge_harness::{SimEnv, WindowGraph};

fn single_attempt() -> RetryPolicy {
    RetryPolicy { max_attempts: 1, interval_ms: 300 }
}

#[tokio::test]
async fn finds_api_on_direct_parent_without_sleeping() {
    let mut builder = WindowGraph::builder();
    let ids = builder.chain(2);
    builder.mount_api(ids[1], "lms");
    let graph = builder.build();
    let env = SimEnv::new();

    let api = locate(&env, &graph.window(ids[0]), &RetryPolicy::default()).await.unwrap();

    assert_eq!(api, "lms");
    assert!(env.sleeps().is_empty());
    assert_eq!(graph.top_lookups(), 0);
}

#[tokio::test]
async fn nearest_ancestor_wins() {
    let mut builder = WindowGraph::builder();
    let ids = builder.chain(4);
    builder.mount_api(ids[2], "inner").mount_api(ids[3], "outer");
    let graph = builder.build();

    let api = locate(&SimEnv::new(), &graph.window(ids[0]), &single_attempt()).await.unwrap();

    assert_eq!(api, "inner");
}

#[tokio::test]
async fn own_api_is_not_consulted() {
    let mut builder = WindowGraph::builder();
    let top = builder.top_window();
    builder.mount_api(top, "self");
    let graph = builder.build();

    let result = locate(&SimEnv::new(), &graph.window(top), &single_attempt()).await;

    assert_eq!(result, Err(LocateError::ApiNotFound { attempts: 1 }));
}

#[tokio::test]
async fn exhausts_default_budget_on_the_fixed_interval() {
    let mut builder = WindowGraph::<&str>::builder();
    let ids = builder.chain(3);
    let graph = builder.build();
    let env = SimEnv::new();

    let result = locate(&env, &graph.window(ids[0]), &RetryPolicy::default()).await;

    assert_eq!(result, Err(LocateError::ApiNotFound { attempts: 10 }));
    assert_eq!(graph.top_lookups(), 10);
    assert_eq!(env.sleeps(), vec![Duration::from_millis(300); 9]);
    assert_eq!(env.elapsed(), Duration::from_millis(2700));
}

#[tokio::test]
async fn popup_uses_opener_chain() {
    let mut builder = WindowGraph::builder();
    let lms = builder.chain(2);
    builder.mount_api(lms[1], "lms");
    let popup = builder.top_window();
    builder.set_opener(popup, lms[0]);
    let graph = builder.build();

    let api = locate(&SimEnv::new(), &graph.window(popup), &single_attempt()).await.unwrap();

    assert_eq!(api, "lms");
}

#[tokio::test]
async fn opener_is_read_from_top_window() {
    // Content framed inside a popup: the opener hangs off the popup's top
    let mut builder = WindowGraph::builder();
    let lms = builder.top_window();
    builder.mount_api(lms, "lms");
    let popup = builder.chain(3);
    builder.set_opener(popup[2], lms);
    let graph = builder.build();

    let api = locate(&SimEnv::new(), &graph.window(popup[0]), &single_attempt()).await.unwrap();

    assert_eq!(api, "lms");
}

#[test]
fn hop_cap_is_inclusive() {
    // Walk starts at the content window's parent, which is hop 0
    let mut builder = WindowGraph::builder();
    let ids = builder.chain(MAX_PARENT_HOPS + 3);
    builder.mount_api(ids[MAX_PARENT_HOPS + 1], "far");
    let graph = builder.build();
    assert_eq!(locate_once(&graph.window(ids[0])), Some("far"));

    let mut builder = WindowGraph::builder();
    let ids = builder.chain(MAX_PARENT_HOPS + 3);
    builder.mount_api(ids[MAX_PARENT_HOPS + 2], "too far");
    let graph = builder.build();
    assert_eq!(locate_once(&graph.window(ids[0])), None);
}

#[test]
fn deep_chain_falls_back_to_opener() {
    let mut builder = WindowGraph::builder();
    let lms = builder.top_window();
    builder.mount_api(lms, "opener");
    let ids = builder.chain(MAX_PARENT_HOPS + 3);
    let top = ids[MAX_PARENT_HOPS + 2];
    builder.mount_api(top, "unreachable").set_opener(top, lms);
    let graph = builder.build();

    assert_eq!(locate_once(&graph.window(ids[0])), Some("opener"));
}

#[test]
fn cross_origin_ancestor_ends_the_walk() {
    let mut builder = WindowGraph::builder();
    let ids = builder.chain(3);
    builder.deny_api(ids[1]).mount_api(ids[2], "behind");
    let graph = builder.build();

    assert_eq!(locate_once(&graph.window(ids[0])), None);
}

#[test]
fn cross_origin_parent_still_tries_opener() {
    let mut builder = WindowGraph::builder();
    let lms = builder.top_window();
    builder.mount_api(lms, "lms");
    let ids = builder.chain(2);
    builder.deny_parent(ids[0]).set_opener(ids[1], lms);
    let graph = builder.build();

    assert_eq!(locate_once(&graph.window(ids[0])), Some("lms"));
}

#[test]
fn cross_origin_opener_is_not_found() {
    let mut builder = WindowGraph::builder();
    let lms = builder.top_window();
    builder.mount_api(lms, "lms");
    let popup = builder.top_window();
    builder.set_opener(popup, lms).deny_opener(popup);
    let graph = builder.build();

    assert_eq!(locate_once(&graph.window(popup)), None);
}

#[test]
fn detached_window_has_nothing_to_walk() {
    let mut builder = WindowGraph::<&str>::builder();
    let window = builder.detached_window();
    let graph = builder.build();

    assert_eq!(locate_once(&graph.window(window)), None);
}
