// tests/integration/string_commands_test.rs

//! Integration tests for SET, GET, and TYPE.

use super::test_helpers::{TestContext, bulk};
use pyropedb::core::{PyropeError, RespValue};

#[tokio::test]
async fn test_set_get_roundtrip() {
    let ctx = TestContext::new();

    let result = ctx.run(&["SET", "mykey", "myvalue"]).await.unwrap();
    assert_eq!(result, RespValue::SimpleString("OK".into()));

    let result = ctx.run(&["GET", "mykey"]).await.unwrap();
    assert_eq!(result, bulk("myvalue"));
}

#[tokio::test]
async fn test_get_missing_key_returns_null() {
    let ctx = TestContext::new();
    let result = ctx.run(&["GET", "nosuchkey"]).await.unwrap();
    assert_eq!(result, RespValue::Null);
}

#[tokio::test]
async fn test_set_overwrites_existing_value() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "mykey", "first"]).await.unwrap();
    ctx.run(&["SET", "mykey", "second"]).await.unwrap();

    let result = ctx.run(&["GET", "mykey"]).await.unwrap();
    assert_eq!(result, bulk("second"));
}

#[tokio::test]
async fn test_set_replaces_value_of_any_type() {
    let ctx = TestContext::new();
    ctx.run(&["RPUSH", "mykey", "a"]).await.unwrap();
    ctx.run(&["SET", "mykey", "v"]).await.unwrap();

    let result = ctx.run(&["TYPE", "mykey"]).await.unwrap();
    assert_eq!(result, RespValue::SimpleString("string".into()));
}

#[tokio::test]
async fn test_get_on_list_is_wrongtype() {
    let ctx = TestContext::new();
    ctx.run(&["RPUSH", "mylist", "a"]).await.unwrap();

    let err = ctx.run(&["GET", "mylist"]).await.unwrap_err();
    assert!(matches!(err, PyropeError::WrongType));
    assert_eq!(
        err.to_string(),
        "WRONGTYPE Operation against a key holding the wrong kind of value"
    );
}

#[tokio::test]
async fn test_type_reports_each_tag() {
    let ctx = TestContext::new();
    ctx.run(&["SET", "s", "v"]).await.unwrap();
    ctx.run(&["RPUSH", "l", "v"]).await.unwrap();
    ctx.run(&["XADD", "x", "1-1", "f", "v"]).await.unwrap();

    assert_eq!(
        ctx.run(&["TYPE", "s"]).await.unwrap(),
        RespValue::SimpleString("string".into())
    );
    assert_eq!(
        ctx.run(&["TYPE", "l"]).await.unwrap(),
        RespValue::SimpleString("list".into())
    );
    assert_eq!(
        ctx.run(&["TYPE", "x"]).await.unwrap(),
        RespValue::SimpleString("stream".into())
    );
    assert_eq!(
        ctx.run(&["TYPE", "missing"]).await.unwrap(),
        RespValue::SimpleString("none".into())
    );
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let ctx = TestContext::new();
    let err = ctx.run(&["FLUSHALL"]).await.unwrap_err();
    assert!(matches!(err, PyropeError::UnknownCommand(_)));
}

#[tokio::test]
async fn test_ping_and_echo() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.run(&["PING"]).await.unwrap(),
        RespValue::SimpleString("PONG".into())
    );
    assert_eq!(
        ctx.run(&["ECHO", "Hello, World!"]).await.unwrap(),
        bulk("Hello, World!")
    );
}

#[tokio::test]
async fn test_command_name_is_case_insensitive() {
    let ctx = TestContext::new();
    ctx.run(&["set", "mykey", "MixedCaseValue"]).await.unwrap();
    // Only the command name is normalized; argument bytes stay untouched.
    let result = ctx.run(&["GeT", "mykey"]).await.unwrap();
    assert_eq!(result, bulk("MixedCaseValue"));
}
