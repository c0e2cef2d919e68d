use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::data::repository;
use crate::error::AppError;
use crate::models::catalog_entry::{CatalogEntry, EntryKind, Importance};
use crate::models::scan::ScanStats;
use crate::scope_path;
use crate::services::identity;

/// Reconcile one directory level of the catalog against the live filesystem.
///
/// Mark-and-sweep: flag every known child as unconfirmed, upsert what the
/// directory listing actually contains, then evict whatever was never
/// reconfirmed. A blind delete-and-reinsert would drop tags and importance
/// for every still-existing file on every rescan; this keeps them.
///
/// Callers that may race on the same directory must serialize through
/// `Catalog`, which holds a per-path lock table.
pub fn synchronize(conn: &Connection, directory: &str) -> Result<ScanStats, AppError> {
    let dir = scope_path::normalize(directory);
    let dir_path = Path::new(&dir);
    if !dir_path.is_dir() {
        return Err(AppError::NotFound(format!("directory not found: {dir}")));
    }

    let mut stats = ScanStats::default();
    let scanned_at = chrono::Utc::now().timestamp_millis();

    let tx = conn.unchecked_transaction()?;
    repository::mark_children(&tx, &dir)?;

    let listing = match fs::read_dir(dir_path) {
        Ok(listing) => listing,
        Err(err) => {
            // Keep the mark state: a later successful pass re-marks this
            // directory and resolves any rows left at the sentinel.
            tx.commit()?;
            warn!(directory = %dir, error = %err, "directory listing failed");
            return Err(err.into());
        }
    };

    for child in listing {
        let child = match child {
            Ok(child) => child,
            Err(_) => {
                stats.errors += 1;
                continue;
            }
        };

        let name = child.file_name().to_string_lossy().to_string();
        let path = scope_path::join_child(&dir, &name);
        let is_dir = child.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let kind = if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        // A failed stat is non-fatal: the child stays visible with unknown
        // size and timestamps.
        let (size_bytes, created_at, modified_at) = match child.metadata() {
            Ok(metadata) => (
                if is_dir { 0 } else { metadata.len() as i64 },
                metadata
                    .created()
                    .ok()
                    .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
                metadata
                    .modified()
                    .ok()
                    .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
            ),
            Err(err) => {
                debug!(path = %path, error = %err, "stat failed");
                stats.errors += 1;
                (0, None, None)
            }
        };

        let entry = CatalogEntry {
            id: identity::resolve_id(&path),
            path,
            name,
            kind,
            size_bytes,
            created_at,
            modified_at,
            parent_path: dir.clone(),
            tags: String::new(),
            importance: Importance::Normal,
            last_scanned: scanned_at,
        };
        repository::upsert_scanned(&tx, &entry)?;

        match kind {
            EntryKind::Directory => stats.directories += 1,
            EntryKind::File => stats.files += 1,
        }
    }

    let swept = repository::sweep_children(&tx, &dir)?;
    tx.commit()?;

    debug!(
        directory = %dir,
        files = stats.files,
        directories = stats.directories,
        errors = stats.errors,
        swept,
        "synchronized"
    );

    Ok(stats)
}

/// Directories under `root` for a depth-limited descent, one entry per level
/// the caller should synchronize after the root itself. `max_depth = 1`
/// means the root level only.
pub fn subdirectories(root: &str, max_depth: usize) -> Vec<String> {
    if max_depth <= 1 {
        return Vec::new();
    }

    walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth - 1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| scope_path::normalize(&e.path().to_string_lossy()))
        .collect()
}
