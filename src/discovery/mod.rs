//! Filesystem discovery for fixtures, dumps and generated migrations.

use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("io error under {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Collect fixture file names under `root`.
///
/// A fixture is any `*.json` file directly inside a directory literally
/// named `fixtures`, at any depth. Names are returned as bare file names
/// (Django's `loaddata` resolves them itself) and are not deduplicated
/// across directories.
pub fn fixture_files(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    let pattern = root.join("**").join("fixtures").join("*.json");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut names = Vec::new();
    for entry in glob(&pattern).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.clone(),
        source,
    })? {
        let path = match entry {
            Ok(path) => path,
            // Unreadable entries are skipped, matching os.walk behavior.
            Err(err) => {
                debug!("skipping unreadable fixture entry: {err}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
    }

    info!("found fixtures: {names:?}");
    Ok(names)
}

/// Select the most recently created file under `root/dumps`.
///
/// Returns `None` when the directory is missing or holds no files.
/// Creation time falls back to modification time on filesystems that
/// do not record it.
pub fn latest_dump(root: &Path) -> Result<Option<PathBuf>, DiscoveryError> {
    let pattern = root.join("dumps").join("*");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in glob(&pattern).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.clone(),
        source,
    })? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                debug!("skipping unreadable dump entry: {err}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let meta = fs::metadata(&path).map_err(|source| DiscoveryError::Io {
            path: path.clone(),
            source,
        })?;
        let created = meta.created().or_else(|_| meta.modified()).map_err(
            |source| DiscoveryError::Io {
                path: path.clone(),
                source,
            },
        )?;

        match &newest {
            Some((time, _)) if *time >= created => {}
            _ => newest = Some((created, path)),
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Delete generated migration files under `apps_dir/*/migrations`,
/// keeping `__init__.py` and `__pycache__`.
///
/// Non-directory entries under `apps_dir` are ignored rather than
/// treated as errors. Returns the removed paths.
pub fn delete_migrations(apps_dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut removed = Vec::new();

    let apps = fs::read_dir(apps_dir).map_err(|source| DiscoveryError::Io {
        path: apps_dir.to_path_buf(),
        source,
    })?;

    for app in apps {
        let app = app.map_err(|source| DiscoveryError::Io {
            path: apps_dir.to_path_buf(),
            source,
        })?;
        if !app.path().is_dir() {
            continue;
        }

        let migrations = app.path().join("migrations");
        if !migrations.is_dir() {
            continue;
        }

        let entries = fs::read_dir(&migrations).map_err(|source| DiscoveryError::Io {
            path: migrations.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| DiscoveryError::Io {
                path: migrations.clone(),
                source,
            })?;
            let name = entry.file_name();
            if name == "__init__.py" || name == "__pycache__" {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            fs::remove_file(&path).map_err(|source| DiscoveryError::Io {
                path: path.clone(),
                source,
            })?;
            info!("removed {}", path.display());
            removed.push(path);
        }
    }

    Ok(removed)
}
