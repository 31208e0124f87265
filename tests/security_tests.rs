//! Containment: no request target can ever resolve to a path outside the
//! served root, and no dotfile is ever served (spec.md §4.2, §8).

mod support;

use quark_rs::Config;
use support::{raw_request, Server};
use tempfile::TempDir;

fn status_line(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == b'\r').unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

async fn serve_tree() -> (TempDir, Server) {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("public")).unwrap();
    std::fs::write(dir.path().join("public/a.txt"), b"ok").unwrap();
    std::fs::write(dir.path().join(".secret"), b"nope").unwrap();
    let server = Server::start(Config {
        root: dir.path().join("public"),
        ..Config::default()
    })
    .await;
    (dir, server)
}

#[tokio::test]
async fn traversal_above_root_never_escapes() {
    let (_dir, server) = serve_tree().await;
    let addr = server.addr;

    for target in [
        "/../.secret",
        "/../../../../etc/passwd",
        "/%2e%2e/%2e%2e/etc/passwd",
        "/a.txt/../../.secret",
    ] {
        let req = format!("GET {target} HTTP/1.1\r\n\r\n");
        let target = target.to_string();
        let addr = addr;
        let raw = tokio::task::spawn_blocking(move || raw_request(addr, req.as_bytes()))
            .await
            .unwrap();
        let line = status_line(&raw);
        assert!(
            !line.contains(" 200 ") || target == "/a.txt",
            "traversal payload {target:?} was not contained: {line}"
        );
    }
}

#[tokio::test]
async fn dotfile_segment_is_forbidden_even_inside_root() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".secret"), b"nope").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET /.secret HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 403"));
}

#[tokio::test]
async fn nested_dotfile_segment_is_forbidden() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".git/config"), b"nope").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw =
        tokio::task::spawn_blocking(move || raw_request(addr, b"GET /.git/config HTTP/1.1\r\n\r\n"))
            .await
            .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 403"));
}

#[tokio::test]
async fn legitimate_file_within_root_is_still_served() {
    let (_dir, server) = serve_tree().await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET /a.txt HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    assert!(status_line(&raw).starts_with("HTTP/1.1 200"));
}
