//! Integration tests for inlet.
//!
//! These tests verify the input layer end to end across both modes and
//! both stream flavors, using mocks so behavior is identical in
//! interactive shells and CI.

use std::sync::Arc;

use serde_json::json;

use inlet::{
    collect, collect_async, convert, AsyncLineStream, InputError, LineStream, MockPrompter,
    MockStdin, ModeResolver, PromptSpec, ScalarPrompt, StaticContext,
};

fn interactive() -> ModeResolver {
    ModeResolver::new()
}

fn json_mode() -> ModeResolver {
    ModeResolver::with_context(Arc::new(StaticContext::new(true, false)))
}

// ============================================================================
// Test: blocking and cooperative streams agree
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn stream_flavors_agree_on_plain_lines() {
    let input = "alpha\nbeta\n\ngamma";

    let blocking: Vec<String> =
        LineStream::with_reader(Arc::new(MockStdin::piped(input)), &interactive()).collect();

    let mut stream = AsyncLineStream::with_reader(Arc::new(MockStdin::piped(input)), &interactive());
    let cooperative = collect_async(&mut stream, None).await;

    assert_eq!(blocking, vec!["alpha", "beta", "", "gamma"]);
    assert_eq!(blocking, cooperative);
}

#[tokio::test(flavor = "multi_thread")]
async fn stream_flavors_agree_on_json_documents() {
    let input = r#"[1, "a", {"b": 2}]"#;

    let blocking: Vec<String> =
        LineStream::with_reader(Arc::new(MockStdin::piped(input)), &json_mode()).collect();

    let mut stream = AsyncLineStream::with_reader(Arc::new(MockStdin::piped(input)), &json_mode());
    let cooperative = collect_async(&mut stream, None).await;

    assert_eq!(blocking, vec!["1", "a", r#"{"b":2}"#]);
    assert_eq!(blocking, cooperative);
}

// ============================================================================
// Test: JSON wire shapes
// ============================================================================

#[test]
fn top_level_array_fans_out() {
    let stream = LineStream::with_reader(
        Arc::new(MockStdin::piped(r#"["x", [1, 2], null]"#)),
        &json_mode(),
    );
    // One level of fan-out only: the nested array stays serialized.
    assert_eq!(stream.collect::<Vec<_>>(), vec!["x", "[1,2]", "null"]);
}

#[test]
fn non_array_document_is_one_line() {
    for (input, expected) in [
        (r#"{"x": 1}"#, r#"{"x":1}"#),
        ("\"plain\"", "plain"),
        ("3.5", "3.5"),
        ("false", "false"),
    ] {
        let stream = LineStream::with_reader(Arc::new(MockStdin::piped(input)), &json_mode());
        assert_eq!(stream.collect::<Vec<_>>(), vec![expected], "input: {input}");
    }
}

#[test]
fn malformed_json_falls_back_without_losing_lines() {
    let stream = LineStream::with_reader(
        Arc::new(MockStdin::piped("not json at all\nsecond line")),
        &json_mode(),
    );
    assert_eq!(
        stream.collect::<Vec<_>>(),
        vec!["not json at all", "second line"]
    );
}

// ============================================================================
// Test: scalar prompts
// ============================================================================

#[test]
fn prompt_default_and_conversion_on_empty_input() {
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Count: ").default("5").convert(convert::integer),
        Arc::new(MockPrompter::with_response("")),
    );
    let outcome = prompt.read(&interactive()).unwrap();
    assert_eq!(outcome.value, json!(5));
}

#[test]
fn prompt_converter_failure_returns_raw_input() {
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Count: ").convert(convert::integer),
        Arc::new(MockPrompter::with_response("twelve")),
    );
    let outcome = prompt.read(&interactive()).unwrap();
    assert_eq!(outcome.value, json!("twelve"));
}

#[test]
fn prompt_json_mode_wraps_and_reports_failure() {
    // Healthy read: wrapped under the output key.
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Name: ").json_key("name"),
        Arc::new(MockPrompter::with_response("Ada")),
    );
    let outcome = prompt.read(&json_mode()).unwrap();
    assert_eq!(outcome.value, json!({"name": "Ada"}));

    // Closed stdin: default comes back with the error embedded.
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Name: ").json_key("name").default("anonymous"),
        Arc::new(MockPrompter::closed()),
    );
    let outcome = prompt.read(&json_mode()).unwrap();
    assert_eq!(outcome.value["name"], json!("anonymous"));
    assert!(outcome.value["error"].is_string());
}

#[test]
fn prompt_interactive_failure_without_default_errors() {
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Name: "),
        Arc::new(MockPrompter::closed()),
    );
    assert!(matches!(
        prompt.read(&interactive()),
        Err(InputError::InputClosed)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn prompt_dispatches_off_the_scheduler() {
    let prompt = ScalarPrompt::with_prompter(
        PromptSpec::new("Count: ").convert(convert::integer),
        Arc::new(MockPrompter::with_response("3")),
    );
    let outcome = prompt.read_async(&interactive()).await.unwrap();
    assert_eq!(outcome.value, json!(3));
}

// ============================================================================
// Test: bounded collection
// ============================================================================

#[test]
fn collect_limit_takes_first_three_of_ten() {
    let input = (1..=10).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
    let stream = LineStream::with_reader(Arc::new(MockStdin::piped(input)), &interactive());
    assert_eq!(collect(stream, Some(3)), vec!["1", "2", "3"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn collect_async_limit_does_not_tear_down_stream() {
    let input = (1..=10).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
    let mut stream = AsyncLineStream::with_reader(Arc::new(MockStdin::piped(input)), &interactive());

    assert_eq!(collect_async(&mut stream, Some(3)).await, vec!["1", "2", "3"]);
    // The rest of the stream is still there, in order.
    assert_eq!(
        collect_async(&mut stream, None).await,
        vec!["4", "5", "6", "7", "8", "9", "10"]
    );
}

// ============================================================================
// Test: cancellation
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_mid_await_neither_loses_nor_replays_lines() {
    let mut stream =
        AsyncLineStream::with_reader(Arc::new(MockStdin::piped("one\ntwo\nthree")), &interactive());

    assert_eq!(stream.next_line().await, Some("one".to_string()));

    // Cancel a pending await by racing it against a ready branch.
    tokio::select! {
        biased;
        _ = std::future::ready(()) => {}
        _ = stream.next_line() => panic!("ready branch should win"),
    }

    // Already-delivered lines are not replayed and none were dropped.
    assert_eq!(stream.next_line().await, Some("two".to_string()));
    assert_eq!(stream.next_line().await, Some("three".to_string()));
    assert_eq!(stream.next_line().await, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_stream_terminates_cleanly() {
    let mut stream =
        AsyncLineStream::with_reader(Arc::new(MockStdin::piped("a\nb\nc\nd\ne")), &interactive());
    assert_eq!(stream.next_line().await, Some("a".to_string()));
    drop(stream);
    // No panic, no hang: the reader observes the closed channel and
    // stops on its own.
}

// ============================================================================
// Test: stream errors terminate without surfacing
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn decode_error_ends_both_flavors_after_delivered_lines() {
    let blocking: Vec<String> = LineStream::with_reader(
        Arc::new(MockStdin::piped_then_error("ok line", "invalid utf-8")),
        &interactive(),
    )
    .collect();
    assert_eq!(blocking, vec!["ok line"]);

    let mut stream = AsyncLineStream::with_reader(
        Arc::new(MockStdin::piped_then_error("ok line", "invalid utf-8")),
        &interactive(),
    );
    assert_eq!(stream.next_line().await, Some("ok line".to_string()));
    assert_eq!(stream.next_line().await, None);
}
