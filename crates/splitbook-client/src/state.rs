use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};

use crate::{ClientError, ClientResult};

/// Database file name inside the ledger home.
pub const LEDGER_DB_FILE: &str = "ledger.db";

const HOME_ENV_VAR: &str = "SPLITBOOK_HOME";
const DEFAULT_HOME_DIR: &str = ".splitbook";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Where the ledger lives: an explicit override, else `$SPLITBOOK_HOME`,
/// else `~/.splitbook`. Relative paths are anchored to the working
/// directory so the stored `db_path` stays usable after a chdir.
pub fn resolve_ledger_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => default_ledger_home()?,
    };
    absolutize(&candidate)
}

pub fn ensure_ledger_directory(path: &Path) -> ClientResult<()> {
    fs::create_dir_all(path).map_err(|error| map_io_error(path, &error))?;
    set_private_permissions_best_effort(path);
    Ok(())
}

pub fn ledger_db_path(home: &Path) -> PathBuf {
    home.join(LEDGER_DB_FILE)
}

pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    connection
        .busy_timeout(BUSY_TIMEOUT)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

pub fn map_io_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::ledger_locked(path)
        }
        Some(ErrorCode::NotADatabase) => ClientError::ledger_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

fn default_ledger_home() -> ClientResult<PathBuf> {
    if let Some(override_path) = std::env::var_os(HOME_ENV_VAR) {
        return Ok(PathBuf::from(override_path));
    }
    match home::home_dir() {
        Some(home_path) => Ok(home_path.join(DEFAULT_HOME_DIR)),
        None => Err(ClientError::ledger_init_failed(
            Path::new("."),
            "Could not resolve a home directory for ledger initialization.",
        )),
    }
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::ledger_init_failed(path, &error.to_string()))
}

#[cfg(unix)]
fn set_private_permissions_best_effort(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn set_private_permissions_best_effort(_path: &Path) {}
