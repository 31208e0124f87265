//! Directory listing, index-document precedence, and the
//! trailing-slash redirect (spec.md §4.5, §4.6).

mod support;

use quark_rs::Config;
use support::{raw_request, Server};
use tempfile::TempDir;

fn headers_and_body(raw: &[u8]) -> (String, String) {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response missing header terminator");
    (
        String::from_utf8_lossy(&raw[..split]).into_owned(),
        String::from_utf8_lossy(&raw[split + 4..]).into_owned(),
    )
}

#[tokio::test]
async fn directory_without_trailing_slash_redirects_with_301() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET /sub HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    let (headers, _) = headers_and_body(&raw);
    assert!(headers.starts_with("HTTP/1.1 301"));
    assert!(headers.contains("Location: /sub/"));
}

#[tokio::test]
async fn directory_with_index_document_serves_it_instead_of_a_listing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<h1>home</h1>").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET / HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    let (headers, body) = headers_and_body(&raw);
    assert!(headers.starts_with("HTTP/1.1 200"));
    assert_eq!(body, "<h1>home</h1>");
}

#[tokio::test]
async fn directory_without_index_falls_back_to_a_listing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET / HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    let (headers, body) = headers_and_body(&raw);
    assert!(headers.starts_with("HTTP/1.1 200"));
    assert!(body.contains("Index of"));
    assert!(body.contains("href=\"sub\">sub/</a>"));
    assert!(body.contains("href=\"a.txt\">a.txt</a>"));
}

#[tokio::test]
async fn listing_disabled_yields_404_when_no_index() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
    let server = Server::start(Config {
        root: dir.path().to_path_buf(),
        list_dirs: false,
        ..Config::default()
    })
    .await;
    let addr = server.addr;

    let raw = tokio::task::spawn_blocking(move || raw_request(addr, b"GET / HTTP/1.1\r\n\r\n"))
        .await
        .unwrap();
    let (headers, _) = headers_and_body(&raw);
    assert!(headers.starts_with("HTTP/1.1 404"));
}
