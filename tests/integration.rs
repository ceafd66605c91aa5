use respkv::aof::{AofConfig, AppendOnlyFile, SyncPolicy};
use respkv::persistence::{Disabled, Persistence};
use respkv::Server;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

async fn start(persistence: Arc<dyn Persistence>) -> (Server, TcpStream, JoinHandle<()>) {
    let server = Server::new(persistence).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let serving = server.clone();
    let task = tokio::spawn(async move {
        let _ = serving.serve(listener).await;
    });

    let client = TcpStream::connect(addr).await.unwrap();
    (server, client, task)
}

fn aof(path: &Path) -> Arc<dyn Persistence> {
    let config = AofConfig::new(path).with_sync_policy(SyncPolicy::Always);
    Arc::new(AppendOnlyFile::open(&config).unwrap())
}

async fn roundtrip(client: &mut TcpStream, request: &[u8], expected_len: usize) -> Vec<u8> {
    client.write_all(request).await.unwrap();

    let mut response = vec![0u8; expected_len];
    client.read_exact(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_ping_over_tcp() {
    let (_server, mut client, task) = start(Arc::new(Disabled)).await;

    let response = roundtrip(&mut client, b"*1\r\n$4\r\nPING\r\n", 7).await;
    assert_eq!(response, b"+PONG\r\n");

    task.abort();
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restart.aof");

    let (server, mut client, task) = start(aof(&path)).await;
    let response = roundtrip(&mut client, b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n", 5).await;
    assert_eq!(response, b"+OK\r\n");
    let response = roundtrip(
        &mut client,
        b"*4\r\n$4\r\nHSET\r\n$4\r\nuser\r\n$4\r\nname\r\n$3\r\nada\r\n",
        5,
    )
    .await;
    assert_eq!(response, b"+OK\r\n");

    server.shutdown().unwrap();
    task.abort();
    drop(client);

    let (_server, mut client, task) = start(aof(&path)).await;
    let response = roundtrip(&mut client, b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n", 9).await;
    assert_eq!(response, b"$3\r\nbar\r\n");
    let response = roundtrip(
        &mut client,
        b"*3\r\n$4\r\nHGET\r\n$4\r\nuser\r\n$4\r\nname\r\n",
        9,
    )
    .await;
    assert_eq!(response, b"$3\r\nada\r\n");

    task.abort();
}

#[tokio::test]
async fn test_hgetall() {
    let (server, mut client, task) = start(Arc::new(Disabled)).await;

    roundtrip(&mut client, b"*4\r\n$4\r\nHSET\r\n$1\r\nh\r\n$2\r\nf1\r\n$2\r\nv1\r\n", 5).await;
    roundtrip(&mut client, b"*4\r\n$4\r\nHSET\r\n$1\r\nh\r\n$2\r\nf2\r\n$2\r\nv2\r\n", 5).await;

    // Field order is unspecified: "*2\r\n" followed by two "$2\r\nvN\r\n"
    let response = roundtrip(&mut client, b"*2\r\n$7\r\nHGETALL\r\n$1\r\nh\r\n", 20).await;
    assert_eq!(&response[..4], b"*2\r\n");
    let mut values = vec![&response[4..12], &response[12..20]];
    values.sort();
    assert_eq!(values, vec![&b"$2\r\nv1\r\n"[..], &b"$2\r\nv2\r\n"[..]]);

    assert_eq!(server.interpreter().store().hashes().len(), 1);
    task.abort();
}

#[tokio::test]
async fn test_missing_keys_are_null() {
    let (_server, mut client, task) = start(Arc::new(Disabled)).await;

    let response = roundtrip(&mut client, b"*2\r\n$3\r\nGET\r\n$4\r\nnope\r\n", 5).await;
    assert_eq!(response, b"$-1\r\n");

    let response = roundtrip(&mut client, b"*2\r\n$7\r\nHGETALL\r\n$4\r\nnope\r\n", 5).await;
    assert_eq!(response, b"$-1\r\n");

    let response = roundtrip(&mut client, b"*3\r\n$4\r\nHGET\r\n$4\r\nnope\r\n$1\r\nf\r\n", 5).await;
    assert_eq!(response, b"$-1\r\n");

    task.abort();
}

#[tokio::test]
async fn test_concurrent_clients_share_state() {
    let (server, mut first, task) = start(Arc::new(Disabled)).await;

    // A second client on the same listener
    let addr = first.peer_addr().unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();

    roundtrip(&mut first, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n", 5).await;
    let response = roundtrip(&mut second, b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n", 7).await;
    assert_eq!(response, b"$1\r\nv\r\n");

    assert_eq!(server.interpreter().store().strings().len(), 1);
    task.abort();
}
