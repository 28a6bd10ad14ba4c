// tests/integration/stream_commands_test.rs

//! Integration tests for stream commands: XADD, XRANGE, XREAD.

use super::test_helpers::{TestContext, bulk};
use pyropedb::core::{PyropeError, RespValue};

fn entry(id: &str, fields: &[&str]) -> RespValue {
    RespValue::Array(vec![
        bulk(id),
        RespValue::Array(fields.iter().map(|f| bulk(f)).collect()),
    ])
}

// ===== XADD Tests =====

#[tokio::test]
async fn test_xadd_explicit_id_returns_id() {
    let ctx = TestContext::new();
    let result = ctx.run(&["XADD", "s", "1-1", "field", "value"]).await.unwrap();
    assert_eq!(result, bulk("1-1"));
}

#[tokio::test]
async fn test_xadd_rejects_zero_id() {
    let ctx = TestContext::new();
    let err = ctx.run(&["XADD", "s", "0-0", "f", "v"]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "The ID specified in XADD must be greater than 0-0"
    );
}

#[tokio::test]
async fn test_xadd_rejects_non_monotonic_id() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "5-5", "f", "v"]).await.unwrap();

    for stale in ["5-5", "5-4", "4-9"] {
        let err = ctx.run(&["XADD", "s", stale, "f", "v"]).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The ID specified in XADD is equal or smaller than the target stream top item"
        );
    }
}

#[tokio::test]
async fn test_xadd_rejection_leaves_stream_intact() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "0-1", "t", "96"]).await.unwrap();
    ctx.run(&["XADD", "s", "0-1", "t", "97"]).await.unwrap_err();

    let result = ctx.run(&["XRANGE", "s", "-", "+"]).await.unwrap();
    assert_eq!(result, RespValue::Array(vec![entry("0-1", &["t", "96"])]));
}

#[tokio::test]
async fn test_xadd_rejection_does_not_create_key() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "0-0", "f", "v"]).await.unwrap_err();
    assert_eq!(
        ctx.run(&["TYPE", "s"]).await.unwrap(),
        RespValue::SimpleString("none".into())
    );
}

#[tokio::test]
async fn test_xadd_auto_sequence_same_millis() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "5-1", "f", "v"]).await.unwrap();
    let result = ctx.run(&["XADD", "s", "5-*", "f", "v"]).await.unwrap();
    assert_eq!(result, bulk("5-2"));
}

#[tokio::test]
async fn test_xadd_auto_sequence_new_millis_starts_at_zero() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "5-1", "f", "v"]).await.unwrap();
    let result = ctx.run(&["XADD", "s", "7-*", "f", "v"]).await.unwrap();
    assert_eq!(result, bulk("7-0"));
}

#[tokio::test]
async fn test_xadd_auto_sequence_zero_millis_starts_at_one() {
    let ctx = TestContext::new();
    let result = ctx.run(&["XADD", "s", "0-*", "f", "v"]).await.unwrap();
    assert_eq!(result, bulk("0-1"));
}

#[tokio::test]
async fn test_xadd_bare_millis_auto_fills_sequence() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "5", "f", "v"]).await.unwrap();
    let result = ctx.run(&["XADD", "s", "5", "f", "v"]).await.unwrap();
    assert_eq!(result, bulk("5-1"));
}

#[tokio::test]
async fn test_xadd_fully_auto_id_is_monotonic() {
    let ctx = TestContext::new();
    let first = ctx.run(&["XADD", "s", "*", "f", "v"]).await.unwrap();
    let second = ctx.run(&["XADD", "s", "*", "f", "v"]).await.unwrap();
    let (RespValue::BulkString(a), RespValue::BulkString(b)) = (first, second) else {
        panic!("XADD should reply with bulk string IDs");
    };
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_xadd_on_string_key_is_wrongtype() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "mykey", "v"]).await.unwrap();
    let err = ctx.run(&["XADD", "mykey", "1-1", "f", "v"]).await.unwrap_err();
    assert!(matches!(err, PyropeError::WrongType));
}

// ===== XRANGE Tests =====

#[tokio::test]
async fn test_xrange_inclusive_bounds() {
    let ctx = TestContext::new();
    for id in ["1-1", "2-1", "3-1"] {
        ctx.run(&["XADD", "s", id, "f", "v"]).await.unwrap();
    }

    let result = ctx.run(&["XRANGE", "s", "1-1", "2-1"]).await.unwrap();
    assert_eq!(
        result,
        RespValue::Array(vec![entry("1-1", &["f", "v"]), entry("2-1", &["f", "v"])])
    );
}

#[tokio::test]
async fn test_xrange_dash_and_plus_cover_everything() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "1-1", "f", "v"]).await.unwrap();
    ctx.run(&["XADD", "s", "9-9", "f", "v"]).await.unwrap();

    let result = ctx.run(&["XRANGE", "s", "-", "+"]).await.unwrap();
    let RespValue::Array(entries) = result else {
        panic!("XRANGE should reply with an array");
    };
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_xrange_bare_millis_covers_whole_millisecond() {
    let ctx = TestContext::new();
    for id in ["5-0", "5-3", "6-0"] {
        ctx.run(&["XADD", "s", id, "f", "v"]).await.unwrap();
    }

    let result = ctx.run(&["XRANGE", "s", "5", "5"]).await.unwrap();
    let RespValue::Array(entries) = result else {
        panic!("XRANGE should reply with an array");
    };
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_xrange_missing_key_is_empty_array() {
    let ctx = TestContext::new();
    let result = ctx.run(&["XRANGE", "nosuchstream", "-", "+"]).await.unwrap();
    assert_eq!(result, RespValue::Array(vec![]));
}

#[tokio::test]
async fn test_xrange_preserves_field_order() {
    let ctx = TestContext::new();
    ctx.run(&["XADD", "s", "1-1", "zeta", "1", "alpha", "2"])
        .await
        .unwrap();

    let result = ctx.run(&["XRANGE", "s", "-", "+"]).await.unwrap();
    assert_eq!(
        result,
        RespValue::Array(vec![entry("1-1", &["zeta", "1", "alpha", "2"])])
    );
}

// ===== XREAD Tests =====

#[tokio::test]
async fn test_xread_returns_entries_strictly_after_id() {
    let ctx = TestContext::new();
    for id in ["1-1", "2-1", "3-1"] {
        ctx.run(&["XADD", "s", id, "f", "v"]).await.unwrap();
    }

    let result = ctx
        .run(&["XREAD", "STREAMS", "s", "1-1"])
        .await
        .unwrap();
    assert_eq!(
        result,
        RespValue::Array(vec![RespValue::Array(vec![
            bulk("s"),
            RespValue::Array(vec![entry("2-1", &["f", "v"]), entry("3-1", &["f", "v"])]),
        ])])
    );
}

#[tokio::test]
async fn test_xread_nested_reply_shape() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.run(&["XADD", "s", "0-1", "t", "96"]).await.unwrap(),
        bulk("0-1")
    );

    let result = ctx.run(&["XREAD", "STREAMS", "s", "0-0"]).await.unwrap();
    assert_eq!(
        result,
        RespValue::Array(vec![RespValue::Array(vec![
            bulk("s"),
            RespValue::Array(vec![entry("0-1", &["t", "96"])]),
        ])])
    );
}

#[tokio::test]
async fn test_xread_missing_key_is_error() {
    let ctx = TestContext::new();
    let err = ctx
        .run(&["XREAD", "STREAMS", "ghost", "0-0"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "XREAD cmd: no stream stored with ghost");
}

#[tokio::test]
async fn test_xread_on_list_key_is_wrongtype() {
    let ctx = TestContext::new();
    ctx.run(&["RPUSH", "mylist", "a"]).await.unwrap();
    let err = ctx
        .run(&["XREAD", "STREAMS", "mylist", "0-0"])
        .await
        .unwrap_err();
    assert!(matches!(err, PyropeError::WrongType));
}
