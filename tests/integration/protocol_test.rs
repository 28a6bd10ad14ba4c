// tests/integration/protocol_test.rs

//! Wire-level tests: exact reply bytes for each reply shape, command
//! framing, and full client/server exchanges over real TCP sockets.

use bytes::{Bytes, BytesMut};
use pyropedb::config::Config;
use pyropedb::connection::ConnectionHandler;
use pyropedb::core::protocol::{RespFrame, RespFrameCodec};
use pyropedb::core::state::ServerState;
use pyropedb::core::{Command, PyropeError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_util::codec::Decoder;

fn encode(frame: RespFrame) -> Vec<u8> {
    frame.encode_to_vec().unwrap()
}

// ===== Reply encoding =====

#[tokio::test]
async fn test_encode_simple_string() {
    assert_eq!(encode(RespFrame::SimpleString("PONG".into())), b"+PONG\r\n");
}

#[tokio::test]
async fn test_encode_error_carries_err_marker() {
    assert_eq!(
        encode(RespFrame::Error("unknown command FOO".into())),
        b"-ERR unknown command FOO\r\n"
    );
}

#[tokio::test]
async fn test_encode_integer() {
    assert_eq!(encode(RespFrame::Integer(3)), b":3\r\n");
}

#[tokio::test]
async fn test_encode_bulk_string() {
    assert_eq!(
        encode(RespFrame::BulkString(Bytes::from_static(b"Hello, World!"))),
        b"$13\r\nHello, World!\r\n"
    );
}

#[tokio::test]
async fn test_encode_null_bulk_and_null_array() {
    assert_eq!(encode(RespFrame::Null), b"$-1\r\n");
    assert_eq!(encode(RespFrame::NullArray), b"*-1\r\n");
}

#[tokio::test]
async fn test_encode_nested_heterogeneous_array() {
    let frame = RespFrame::Array(vec![
        RespFrame::BulkString(Bytes::from_static(b"q")),
        RespFrame::Array(vec![RespFrame::Integer(1), RespFrame::Null]),
    ]);
    assert_eq!(encode(frame), b"*2\r\n$1\r\nq\r\n*2\r\n:1\r\n$-1\r\n");
}

// ===== Command decoding =====

fn decode_one(input: &[u8]) -> Result<Option<RespFrame>, PyropeError> {
    let mut codec = RespFrameCodec;
    let mut buf = BytesMut::from(input);
    codec.decode(&mut buf)
}

#[tokio::test]
async fn test_decode_command_frame() {
    let frame = decode_one(b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n")
        .unwrap()
        .unwrap();
    let command = Command::try_from(frame).unwrap();
    assert_eq!(command.name(), "echo");
}

#[tokio::test]
async fn test_decode_incomplete_frame_waits_for_more() {
    // Half a frame: the decoder asks for more bytes instead of failing.
    let result = decode_one(b"*2\r\n$4\r\nEC").unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_decode_rejects_non_array_command() {
    let frame = decode_one(b"+PING\r\n").unwrap().unwrap();
    let err = Command::try_from(frame).unwrap_err();
    assert_eq!(err.to_string(), "Protocol error: expected array");
}

#[tokio::test]
async fn test_decode_rejects_malformed_length() {
    let err = decode_one(b"*x\r\n").unwrap_err();
    assert_eq!(err.to_string(), "Protocol error: expected integer");
}

#[tokio::test]
async fn test_decode_command_uppercases_name_only() {
    let frame = decode_one(b"*3\r\n$3\r\nset\r\n$1\r\nk\r\n$5\r\nVaLuE\r\n")
        .unwrap()
        .unwrap();
    let Command::Set(set) = Command::try_from(frame).unwrap() else {
        panic!("expected a SET command");
    };
    assert_eq!(set.value, Bytes::from_static(b"VaLuE"));
}

#[tokio::test]
async fn test_decode_binary_payload_with_crlf_inside() {
    // Payload bytes are length-delimited, so embedded CRLF must survive.
    let frame = decode_one(b"*2\r\n$4\r\nECHO\r\n$4\r\na\r\nb\r\n")
        .unwrap()
        .unwrap();
    let RespFrame::Array(items) = frame else {
        panic!("expected array");
    };
    assert_eq!(items[1], RespFrame::BulkString(Bytes::from_static(b"a\r\nb")));
}

// ===== End-to-end over TCP =====

/// Spawns a minimal accept loop over real sockets, returning the bound address.
async fn spawn_server() -> std::net::SocketAddr {
    let state = ServerState::new(Config::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, _) = broadcast::channel(1);

    tokio::spawn(async move {
        let mut session_id = 0u64;
        loop {
            let Ok((socket, peer)) = listener.accept().await else {
                break;
            };
            session_id += 1;
            let state = state.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            tokio::spawn(async move {
                let mut handler =
                    ConnectionHandler::new(socket, peer, state, session_id, shutdown_rx);
                let _ = handler.run().await;
            });
        }
    });
    addr
}

async fn read_reply(stream: &mut TcpStream, expected_len: usize) -> Vec<u8> {
    let mut reply = vec![0u8; expected_len];
    stream.read_exact(&mut reply).await.unwrap();
    reply
}

#[tokio::test]
async fn test_ping_over_socket() {
    let addr = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream.write_all(b"*1\r\n$4\r\nPING\r\n").await.unwrap();
    assert_eq!(read_reply(&mut stream, 7).await, b"+PONG\r\n");
}

#[tokio::test]
async fn test_pipelined_commands_reply_in_order() {
    let addr = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"*1\r\n$4\r\nPING\r\n*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n")
        .await
        .unwrap();
    assert_eq!(read_reply(&mut stream, 7).await, b"+PONG\r\n");
    assert_eq!(read_reply(&mut stream, 8).await, b"$2\r\nhi\r\n");
}

#[tokio::test]
async fn test_unknown_command_keeps_session_open() {
    let addr = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream.write_all(b"*1\r\n$4\r\nNOPE\r\n").await.unwrap();
    assert_eq!(
        read_reply(&mut stream, 27).await,
        b"-ERR unknown command NOPE\r\n".to_vec()
    );

    // The connection survives the error.
    stream.write_all(b"*1\r\n$4\r\nPING\r\n").await.unwrap();
    assert_eq!(read_reply(&mut stream, 7).await, b"+PONG\r\n");
}

#[tokio::test]
async fn test_blpop_rpush_across_connections() {
    let addr = spawn_server().await;

    let mut waiter = TcpStream::connect(addr).await.unwrap();
    waiter
        .write_all(b"*3\r\n$5\r\nBLPOP\r\n$1\r\nq\r\n$1\r\n0\r\n")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut pusher = TcpStream::connect(addr).await.unwrap();
    pusher
        .write_all(b"*3\r\n$5\r\nRPUSH\r\n$1\r\nq\r\n$1\r\nx\r\n")
        .await
        .unwrap();
    assert_eq!(read_reply(&mut pusher, 4).await, b":1\r\n");

    assert_eq!(
        read_reply(&mut waiter, 18).await,
        b"*2\r\n$1\r\nq\r\n$1\r\nx\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_set_px_get_over_socket() {
    let addr = spawn_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"*5\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\nPX\r\n$3\r\n100\r\n")
        .await
        .unwrap();
    assert_eq!(read_reply(&mut stream, 5).await, b"+OK\r\n");

    stream.write_all(b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n").await.unwrap();
    assert_eq!(read_reply(&mut stream, 7).await, b"$1\r\nv\r\n");

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;
    stream.write_all(b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n").await.unwrap();
    assert_eq!(read_reply(&mut stream, 5).await, b"$-1\r\n");
}
