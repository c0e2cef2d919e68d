use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::data::repository;
use crate::error::AppError;
use crate::models::catalog_entry::{CatalogEntry, EntryKind, Importance};
use crate::scope_path;
use crate::services::identity;

/// What happens to descendant catalog rows when a directory is renamed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenamePolicy {
    /// Rewrite every descendant row (path, parent_path, id) in the same
    /// transaction as the directory row itself.
    #[default]
    RewriteDescendants,
    /// Leave descendant rows stale until their directories are rescanned.
    MarkStale,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::Validation(format!(
            "name must not contain path separators: {name}"
        )));
    }
    Ok(())
}

fn stat_new_entry(path: &str, name: &str, kind: EntryKind, parent: &str) -> CatalogEntry {
    let metadata = fs::metadata(path).ok();
    let size_bytes = match (&metadata, kind) {
        (Some(md), EntryKind::File) => md.len() as i64,
        _ => 0,
    };

    CatalogEntry {
        id: identity::resolve_id(path),
        path: path.to_string(),
        name: name.to_string(),
        kind,
        size_bytes,
        created_at: metadata
            .as_ref()
            .and_then(|md| md.created().ok())
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
        modified_at: metadata
            .as_ref()
            .and_then(|md| md.modified().ok())
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
        parent_path: parent.to_string(),
        tags: String::new(),
        importance: Importance::Normal,
        last_scanned: chrono::Utc::now().timestamp_millis(),
    }
}

/// Create an empty file or directory under `parent_path` and insert its
/// catalog row with default metadata.
pub fn create(
    conn: &Connection,
    parent_path: &str,
    name: &str,
    kind: EntryKind,
) -> Result<CatalogEntry, AppError> {
    validate_name(name)?;

    let parent = scope_path::normalize(parent_path);
    if !Path::new(&parent).is_dir() {
        return Err(AppError::NotFound(format!("directory not found: {parent}")));
    }

    let path = scope_path::join_child(&parent, name);
    if Path::new(&path).exists() {
        return Err(AppError::Conflict(format!("target already exists: {path}")));
    }

    match kind {
        EntryKind::Directory => fs::create_dir(&path)?,
        EntryKind::File => {
            fs::File::create(&path)?;
        }
    }

    let entry = stat_new_entry(&path, name, kind, &parent);
    repository::upsert_scanned(conn, &entry)?;
    info!(path = %path, kind = %kind, "created");
    Ok(entry)
}

/// Rename the entry within its parent directory. The id is derived from the
/// path, so the old id is retired and a new one minted in the same store
/// transaction; tags and importance ride along on the row.
pub fn rename(
    conn: &Connection,
    policy: RenamePolicy,
    id: &str,
    new_name: &str,
) -> Result<CatalogEntry, AppError> {
    validate_name(new_name)?;

    let entry = repository::get_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("no catalog entry with id {id}")))?;

    let new_path = scope_path::join_child(&entry.parent_path, new_name);
    if Path::new(&new_path).exists() || repository::get_by_path(conn, &new_path)?.is_some() {
        return Err(AppError::Conflict(format!(
            "target already exists: {new_path}"
        )));
    }

    fs::rename(&entry.path, &new_path)?;

    let new_id = identity::resolve_id(&new_path);
    let tx = conn.unchecked_transaction()?;
    repository::relocate(&tx, &entry.id, &new_id, &new_path, new_name, &entry.parent_path)?;

    if entry.kind == EntryKind::Directory && policy == RenamePolicy::RewriteDescendants {
        for descendant in repository::list_descendants(&tx, &entry.path)? {
            let moved_path = format!("{new_path}{}", &descendant.path[entry.path.len()..]);
            let moved_parent = format!("{new_path}{}", &descendant.parent_path[entry.path.len()..]);
            repository::relocate(
                &tx,
                &descendant.id,
                &identity::resolve_id(&moved_path),
                &moved_path,
                &descendant.name,
                &moved_parent,
            )?;
        }
    }

    tx.commit()?;
    info!(from = %entry.path, to = %new_path, "renamed");

    repository::get_by_id(conn, &new_id)?
        .ok_or_else(|| AppError::General(format!("renamed entry vanished: {new_path}")))
}

/// Remove the filesystem object and every catalog row at or under its path.
pub fn delete(conn: &Connection, id: &str) -> Result<(), AppError> {
    let entry = repository::get_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("no catalog entry with id {id}")))?;

    let target = Path::new(&entry.path);
    if target.is_dir() {
        fs::remove_dir_all(target)?;
    } else if target.exists() {
        fs::remove_file(target)?;
    }

    let removed = repository::delete_subtree(conn, &entry.path)?;
    info!(path = %entry.path, rows = removed, "deleted");
    Ok(())
}
