//! Malformed and oversized requests (spec.md §4.4, §7).

mod support;

use quark_rs::Config;
use support::{raw_request, Server};
use tempfile::TempDir;

fn status_line(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == b'\r').unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[tokio::test]
async fn oversized_header_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        header_max: 64,
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let mut req = b"GET /".to_vec();
    req.extend(std::iter::repeat(b'a').take(500));
    req.extend_from_slice(b" HTTP/1.1\r\n\r\n");

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, &req))
        .await
        .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 431"));
}

#[tokio::test]
async fn empty_request_line_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"\r\n\r\n"))
        .await
        .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 400"));
}

#[tokio::test]
async fn malformed_range_falls_back_to_400() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || {
        raw_request(addr, b"GET /a.txt HTTP/1.1\r\nRange: banana\r\n\r\n")
    })
    .await
    .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 400"));
}

#[tokio::test]
async fn trailing_garbage_after_terminator_is_ignored() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || {
        raw_request(addr, b"GET /a.txt HTTP/1.1\r\n\r\nGARBAGE-NOT-A-REQUEST")
    })
    .await
    .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 200"));
}
