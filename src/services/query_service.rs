use rusqlite::Connection;

use crate::data::repository;
use crate::error::AppError;
use crate::models::catalog_entry::{CatalogEntry, Importance};
use crate::models::category::Category;
use crate::scope_path;

/// Hard cap on search responses so one broad query cannot return the whole
/// catalog.
pub const SEARCH_RESULT_LIMIT: usize = 1000;

pub fn list_children(conn: &Connection, parent_path: &str) -> Result<Vec<CatalogEntry>, AppError> {
    repository::list_by_parent(conn, &scope_path::normalize(parent_path))
}

pub fn search(conn: &Connection, query: &str) -> Result<Vec<CatalogEntry>, AppError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    repository::search(conn, trimmed, SEARCH_RESULT_LIMIT)
}

pub fn filter_by_category(
    conn: &Connection,
    category: &str,
    scope: Option<&str>,
) -> Result<Vec<CatalogEntry>, AppError> {
    let category: Category = category.parse().map_err(AppError::Validation)?;
    let scope = scope.map(scope_path::normalize);
    repository::filter_by_suffixes(conn, category.extensions(), scope.as_deref())
}

pub fn get_by_id(conn: &Connection, id: &str) -> Result<CatalogEntry, AppError> {
    repository::get_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("no catalog entry with id {id}")))
}

/// Canonical tag form: split on comma or hash, trim, drop empties, rejoin.
/// "#work, home,," and "work,home" store identically.
pub fn normalize_tags(raw: &str) -> String {
    raw.split([',', '#'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn update_metadata(
    conn: &Connection,
    id: &str,
    tags: &str,
    importance: &str,
) -> Result<CatalogEntry, AppError> {
    let importance: Importance = importance.parse().map_err(AppError::Validation)?;
    let tags = normalize_tags(tags);

    let changed = repository::update_metadata(conn, id, &tags, &importance.to_string())?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("no catalog entry with id {id}")));
    }
    get_by_id(conn, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use crate::models::catalog_entry::{CatalogEntry, EntryKind};
    use crate::services::identity;

    fn test_conn() -> Connection {
        data::open_in_memory().unwrap()
    }

    fn insert(conn: &Connection, path: &str, kind: EntryKind) -> CatalogEntry {
        let name = path.rsplit('/').next().unwrap().to_string();
        let parent = path.rsplit_once('/').map(|(p, _)| p).unwrap_or("/");
        let entry = CatalogEntry {
            id: identity::resolve_id(path),
            path: path.to_string(),
            name,
            kind,
            size_bytes: 1,
            created_at: None,
            modified_at: Some("2025-01-01T00:00:00Z".to_string()),
            parent_path: parent.to_string(),
            tags: String::new(),
            importance: Importance::Normal,
            last_scanned: 1,
        };
        repository::upsert_scanned(conn, &entry).unwrap();
        entry
    }

    #[test]
    fn test_normalize_tags_handles_both_delimiters() {
        assert_eq!(normalize_tags("#work, home,,"), "work,home");
        assert_eq!(normalize_tags("a#b#c"), "a,b,c");
        assert_eq!(normalize_tags("  spaced , out  "), "spaced,out");
        assert_eq!(normalize_tags(""), "");
        assert_eq!(normalize_tags("#,#,"), "");
    }

    #[test]
    fn test_update_metadata_normalizes_and_persists() {
        let conn = test_conn();
        let entry = insert(&conn, "/docs/plan.md", EntryKind::File);

        let updated = update_metadata(&conn, &entry.id, "#todo, q3", "high").unwrap();
        assert_eq!(updated.tags, "todo,q3");
        assert_eq!(updated.importance, Importance::High);
    }

    #[test]
    fn test_update_metadata_rejects_unknown_importance() {
        let conn = test_conn();
        let entry = insert(&conn, "/docs/plan.md", EntryKind::File);

        let result = update_metadata(&conn, &entry.id, "x", "critical");
        assert!(matches!(result, Err(AppError::Validation(_))));

        // nothing was written
        let unchanged = get_by_id(&conn, &entry.id).unwrap();
        assert_eq!(unchanged.tags, "");
        assert_eq!(unchanged.importance, Importance::Normal);
    }

    #[test]
    fn test_update_metadata_unknown_id() {
        let conn = test_conn();
        let result = update_metadata(&conn, "deadbeef", "x", "normal");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_get_by_id_unknown() {
        let conn = test_conn();
        assert!(matches!(
            get_by_id(&conn, "deadbeef"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_search_blank_query_is_empty() {
        let conn = test_conn();
        insert(&conn, "/docs/readme.md", EntryKind::File);
        assert!(search(&conn, "   ").unwrap().is_empty());
    }

    #[test]
    fn test_search_matches_tags_case_insensitive() {
        let conn = test_conn();
        let entry = insert(&conn, "/docs/scan.pdf", EntryKind::File);
        update_metadata(&conn, &entry.id, "Invoice", "normal").unwrap();

        let results = search(&conn, "invoice").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/docs/scan.pdf");
    }

    #[test]
    fn test_filter_by_category_exact_set() {
        let conn = test_conn();
        insert(&conn, "/dir/a.jpg", EntryKind::File);
        insert(&conn, "/dir/b.docx", EntryKind::File);
        insert(&conn, "/dir/c.mp4", EntryKind::File);

        let images = filter_by_category(&conn, "images", Some("/dir")).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "a.jpg");
    }

    #[test]
    fn test_filter_by_category_unknown_label() {
        let conn = test_conn();
        let result = filter_by_category(&conn, "spreadsheets", None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_list_children_normalizes_parent() {
        let conn = test_conn();
        insert(&conn, "/dir/a.txt", EntryKind::File);

        let children = list_children(&conn, "/dir/").unwrap();
        assert_eq!(children.len(), 1);
    }
}
