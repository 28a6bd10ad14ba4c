// tests/integration/expiry_test.rs

//! Integration tests for TTL behavior: lazy expiry on read, timer-driven
//! removal, and deadline replacement.

use super::test_helpers::{TestContext, bulk};
use pyropedb::core::RespValue;
use std::time::Duration;

#[tokio::test]
async fn test_set_px_expires_after_deadline() {
    let ctx = TestContext::new();

    assert_eq!(
        ctx.run(&["SET", "k", "v", "PX", "100"]).await.unwrap(),
        RespValue::SimpleString("OK".into())
    );
    assert_eq!(ctx.run(&["GET", "k"]).await.unwrap(), bulk("v"));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(ctx.run(&["GET", "k"]).await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_expired_key_reports_type_none() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "k", "v", "PX", "50"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        ctx.run(&["TYPE", "k"]).await.unwrap(),
        RespValue::SimpleString("none".into())
    );
}

#[tokio::test]
async fn test_timer_removes_untouched_key() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "k", "v", "PX", "50"]).await.unwrap();
    assert_eq!(ctx.state.db.get_key_count(), 1);

    // No reads at all: the one-shot timer alone reclaims the key.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(ctx.state.db.get_key_count(), 0);
}

#[tokio::test]
async fn test_set_without_px_clears_deadline() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "k", "v1", "PX", "50"]).await.unwrap();
    ctx.run(&["SET", "k", "v2"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    // The stale timer must not remove the rewritten value.
    assert_eq!(ctx.run(&["GET", "k"]).await.unwrap(), bulk("v2"));
}

#[tokio::test]
async fn test_later_px_replaces_earlier_deadline() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "k", "v1", "PX", "50"]).await.unwrap();
    ctx.run(&["SET", "k", "v2", "PX", "5000"]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    // The first timer fired, but the deadline it was scheduled for is gone.
    assert_eq!(ctx.run(&["GET", "k"]).await.unwrap(), bulk("v2"));
}

#[tokio::test]
async fn test_expired_list_treated_as_absent() {
    let ctx = TestContext::new();
    ctx.run(&["RPUSH", "mylist", "a"]).await.unwrap();
    // Replace the list with a short-lived string, then expire it.
    ctx.run(&["SET", "mylist", "v", "PX", "40"]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        ctx.run(&["LLEN", "mylist"]).await.unwrap(),
        RespValue::Integer(0)
    );
    assert_eq!(
        ctx.run(&["LRANGE", "mylist", "0", "-1"]).await.unwrap(),
        RespValue::Array(vec![])
    );
}
