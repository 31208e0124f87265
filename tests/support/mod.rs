//! Shared end-to-end harness: binds a real `TcpListener` on an ephemeral
//! port, drives it with `quark_rs::serve_connection` per accepted
//! connection, and hands the caller an address to open plain
//! `TcpStream`s against.

use std::io::{Read, Write};
use std::net::TcpStream as StdTcpStream;
use std::sync::Arc;

use quark_rs::log::TracingLogSink;
use quark_rs::{serve_connection, Config};
use tokio::net::TcpListener;
use tokio::time::timeout;

pub struct Server {
    pub addr: std::net::SocketAddr,
}

impl Server {
    /// Mirrors the binary's accept loop: one task per connection, the
    /// whole request/response cycle bounded by `config.connection_timeout`.
    pub async fn start(config: Config) -> Server {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = Arc::new(config);
        let log = Arc::new(TracingLogSink);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, peer)) = listener.accept().await else {
                    break;
                };
                let config = config.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = timeout(
                        config.connection_timeout,
                        serve_connection(&mut stream, &peer.to_string(), &config, log.as_ref()),
                    )
                    .await;
                    use tokio::io::AsyncWriteExt;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Server { addr }
    }
}

/// Send a raw request over a fresh blocking `TcpStream` and return the
/// full response bytes. Used from `#[tokio::test]` bodies via
/// `spawn_blocking` so the blocking socket calls don't stall the runtime.
pub fn raw_request(addr: std::net::SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = StdTcpStream::connect(addr).unwrap();
    stream.write_all(request).unwrap();
    stream
        .set_read_timeout(Some(std::time::Duration::from_secs(2)))
        .unwrap();
    let mut out = Vec::new();
    let _ = stream.read_to_end(&mut out);
    out
}
