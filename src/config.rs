//! Host-supplied, read-only configuration for the core (spec.md §3
//! `Config`, §9 "Global config"), plus the CLI surface that builds it
//! (SPEC_FULL.md §2.3, §6), grounded on quark.c's `ARGBEGIN`/`usage()`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::mime::DEFAULT_MIME_TABLE;

pub const DEFAULT_HEADER_MAX: usize = 4096;
pub const DEFAULT_FIELD_MAX: usize = 200;
pub const DEFAULT_PATH_MAX: usize = 4096;
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// The core's view of server configuration. Immutable once built;
/// shared across connections behind an `Arc` (spec.md §5).
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub index_name: String,
    pub list_dirs: bool,
    pub mime_table: &'static [(&'static str, &'static str)],
    pub header_max: usize,
    pub field_max: usize,
    pub path_max: usize,
    pub connection_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from("."),
            index_name: "index.html".to_string(),
            list_dirs: true,
            mime_table: DEFAULT_MIME_TABLE,
            header_max: DEFAULT_HEADER_MAX,
            field_max: DEFAULT_FIELD_MAX,
            path_max: DEFAULT_PATH_MAX,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

/// A minimal, read-only directory server (spec.md §1).
#[derive(Debug, Parser)]
#[command(name = "quark-rs", version, about, disable_version_flag = true)]
pub struct Cli {
    /// Print version and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: (),

    /// Directory to serve.
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,

    /// Host/address to bind to (TCP mode).
    #[arg(short = 'h', long = "host", default_value = "0.0.0.0", conflicts_with = "unix_socket")]
    pub host: String,

    /// Port to bind to (TCP mode).
    #[arg(short = 'p', long = "port", default_value_t = 8080, conflicts_with = "unix_socket")]
    pub port: u16,

    /// Bind a Unix domain socket at this path instead of TCP.
    #[arg(short = 'U', long = "unix-socket")]
    pub unix_socket: Option<PathBuf>,

    /// Index document served in lieu of a directory listing, when present.
    #[arg(short = 'x', long = "index", default_value = "index.html")]
    pub index: String,

    /// Disable auto-generated directory listings.
    #[arg(long = "no-listing")]
    pub no_listing: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            root: self.dir,
            index_name: self.index,
            list_dirs: !self.no_listing,
            ..Config::default()
        }
    }
}
