//! Opening and closing SQLite stores.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::{error, info};

use crate::error::{PathwayError, Result};

/// Open the legacy source store read-only.
///
/// A missing file is a connection error rather than a new empty database.
pub fn open_source(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    open(path, |p| Connection::open_with_flags(p, flags))
}

/// Open the target store, creating it if needed.
pub fn open_target(path: impl AsRef<Path>) -> Result<Connection> {
    open(path.as_ref(), |p| Connection::open(p))
}

fn open<F>(path: &Path, opener: F) -> Result<Connection>
where
    F: FnOnce(&Path) -> rusqlite::Result<Connection>,
{
    match opener(path) {
        Ok(conn) => {
            info!(path = %path.display(), "Connected to {} successfully", path.display());
            Ok(conn)
        }
        Err(source) => Err(PathwayError::Connection {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Close a connection, logging rather than returning any close failure.
///
/// The connection is released either way.
pub fn close(conn: Connection, label: &str) {
    if let Err((_, e)) = conn.close() {
        error!(store = label, "Error closing {}: {}", label, e);
    }
}
