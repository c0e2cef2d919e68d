use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::AppError;
use crate::models::catalog_entry::{CatalogEntry, EntryKind};

const ENTRY_COLUMNS: &str =
    "id, path, name, kind, size_bytes, created_at, modified_at, parent_path, tags, importance, last_scanned";

fn entry_from_row(row: &Row) -> rusqlite::Result<CatalogEntry> {
    let kind: String = row.get(3)?;
    let importance: String = row.get(9)?;

    Ok(CatalogEntry {
        id: row.get(0)?,
        path: row.get(1)?,
        name: row.get(2)?,
        kind: kind.parse::<EntryKind>().unwrap_or(EntryKind::File),
        size_bytes: row.get(4)?,
        created_at: row.get(5)?,
        modified_at: row.get(6)?,
        parent_path: row.get(7)?,
        tags: row.get(8)?,
        importance: importance.parse().unwrap_or_default(),
        last_scanned: row.get(10)?,
    })
}

fn subtree_pattern(root: &str) -> String {
    if root.ends_with('/') {
        format!("{root}%")
    } else {
        format!("{root}/%")
    }
}

/// Insert a freshly observed entry, or refresh the filesystem-owned columns
/// of an existing one. `tags` and `importance` are absent from the conflict
/// clause: a scan can never overwrite them.
pub fn upsert_scanned(conn: &Connection, entry: &CatalogEntry) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO entries (id, path, name, kind, size_bytes, created_at, modified_at, parent_path, tags, importance, last_scanned)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, '', 'normal', ?9)
         ON CONFLICT(id) DO UPDATE SET
             size_bytes = excluded.size_bytes,
             created_at = excluded.created_at,
             modified_at = excluded.modified_at,
             last_scanned = excluded.last_scanned",
        params![
            entry.id,
            entry.path,
            entry.name,
            entry.kind.to_string(),
            entry.size_bytes,
            entry.created_at,
            entry.modified_at,
            entry.parent_path,
            entry.last_scanned,
        ],
    )?;
    Ok(())
}

pub fn mark_children(conn: &Connection, parent_path: &str) -> Result<usize, AppError> {
    let count = conn.execute(
        "UPDATE entries SET last_scanned = 0 WHERE parent_path = ?1",
        params![parent_path],
    )?;
    Ok(count)
}

pub fn sweep_children(conn: &Connection, parent_path: &str) -> Result<usize, AppError> {
    let count = conn.execute(
        "DELETE FROM entries WHERE parent_path = ?1 AND last_scanned = 0",
        params![parent_path],
    )?;
    Ok(count)
}

pub fn list_by_parent(conn: &Connection, parent_path: &str) -> Result<Vec<CatalogEntry>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE parent_path = ?1 ORDER BY kind ASC, name ASC"
    ))?;

    let entries = stmt
        .query_map(params![parent_path], entry_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

pub fn search(conn: &Connection, query: &str, limit: usize) -> Result<Vec<CatalogEntry>, AppError> {
    // importance is stored as text, so ordering goes through the same rank
    // mapping as Importance::rank.
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries
         WHERE name LIKE ?1 OR tags LIKE ?1
         ORDER BY CASE importance
                 WHEN 'high' THEN 3
                 WHEN 'medium' THEN 2
                 WHEN 'normal' THEN 1
                 ELSE 0
             END DESC,
             kind ASC,
             modified_at DESC
         LIMIT ?2"
    ))?;

    let pattern = format!("%{query}%");
    let entries = stmt
        .query_map(params![pattern, limit as i64], entry_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

pub fn filter_by_suffixes(
    conn: &Connection,
    extensions: &[&str],
    scope: Option<&str>,
) -> Result<Vec<CatalogEntry>, AppError> {
    let mut bindings: Vec<String> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();
    for ext in extensions {
        bindings.push(format!("%.{ext}"));
        conditions.push(format!("name LIKE ?{}", bindings.len()));
    }

    let mut sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE ({})",
        conditions.join(" OR ")
    );

    if let Some(scope) = scope {
        bindings.push(scope.to_string());
        let exact = bindings.len();
        bindings.push(subtree_pattern(scope));
        let prefix = bindings.len();
        sql.push_str(&format!(
            " AND (parent_path = ?{exact} OR parent_path LIKE ?{prefix})"
        ));
    }

    sql.push_str(" ORDER BY kind ASC, name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map(params_from_iter(bindings.iter()), entry_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<CatalogEntry>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"
    ))?;

    let entry = stmt.query_row(params![id], entry_from_row).optional()?;
    Ok(entry)
}

pub fn get_by_path(conn: &Connection, path: &str) -> Result<Option<CatalogEntry>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE path = ?1"
    ))?;

    let entry = stmt.query_row(params![path], entry_from_row).optional()?;
    Ok(entry)
}

pub fn update_metadata(
    conn: &Connection,
    id: &str,
    tags: &str,
    importance: &str,
) -> Result<usize, AppError> {
    let count = conn.execute(
        "UPDATE entries SET tags = ?1, importance = ?2 WHERE id = ?3",
        params![tags, importance, id],
    )?;
    Ok(count)
}

/// Move a row to a new identity in place. Every column not named here
/// (tags, importance, size, timestamps) rides along unchanged.
pub fn relocate(
    conn: &Connection,
    old_id: &str,
    new_id: &str,
    new_path: &str,
    new_name: &str,
    new_parent: &str,
) -> Result<usize, AppError> {
    let count = conn.execute(
        "UPDATE entries SET id = ?1, path = ?2, name = ?3, parent_path = ?4 WHERE id = ?5",
        params![new_id, new_path, new_name, new_parent, old_id],
    )?;
    Ok(count)
}

pub fn list_descendants(conn: &Connection, root: &str) -> Result<Vec<CatalogEntry>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE path LIKE ?1 ORDER BY path ASC"
    ))?;

    let entries = stmt
        .query_map(params![subtree_pattern(root)], entry_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

pub fn delete_subtree(conn: &Connection, root: &str) -> Result<usize, AppError> {
    let count = conn.execute(
        "DELETE FROM entries WHERE path = ?1 OR path LIKE ?2",
        params![root, subtree_pattern(root)],
    )?;
    Ok(count)
}
