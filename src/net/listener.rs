//! Unix socket listener.
//!
//! # Responsibilities
//! - Prepare the socket path (parent directory, stale socket file)
//! - Bind the listening Unix socket
//! - Open the socket file to unprivileged local clients via mode bits

use std::fs;
use std::io;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tokio::net::UnixListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to prepare socket directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to replace non-socket file at {0}")]
    NotASocket(PathBuf),

    #[error("failed to bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set permissions on {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Bind the listening socket described by `config`.
///
/// A leftover socket file from a previous run is removed first; any other
/// kind of file at that path is left alone and reported.
pub fn bind_unix_listener(config: &ListenerConfig) -> Result<UnixListener, ListenerError> {
    let path = config.socket_path.as_path();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ListenerError::Directory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    remove_stale_socket(path)?;

    let listener = UnixListener::bind(path).map_err(|source| ListenerError::Bind {
        path: path.to_path_buf(),
        source,
    })?;

    fs::set_permissions(path, fs::Permissions::from_mode(config.socket_mode)).map_err(
        |source| ListenerError::Permissions {
            path: path.to_path_buf(),
            source,
        },
    )?;

    tracing::info!(
        socket = %path.display(),
        mode = %format!("{:o}", config.socket_mode),
        "Listener bound"
    );

    Ok(listener)
}

fn remove_stale_socket(path: &Path) -> Result<(), ListenerError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {
            tracing::debug!(socket = %path.display(), "Removing stale socket file");
            fs::remove_file(path).map_err(|source| ListenerError::Bind {
                path: path.to_path_buf(),
                source,
            })
        }
        Ok(_) => Err(ListenerError::NotASocket(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ListenerError::Bind {
            path: path.to_path_buf(),
            source,
        }),
    }
}
