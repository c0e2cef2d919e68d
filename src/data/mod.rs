pub mod migrations;
pub mod repository;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::AppError;

pub fn open(path: &Path) -> Result<Connection, AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection, AppError> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

pub fn default_db_path() -> Result<PathBuf, AppError> {
    let dirs = directories::ProjectDirs::from("com", "filedex", "filedex").ok_or_else(|| {
        AppError::General("could not resolve application data directory".to_string())
    })?;
    Ok(dirs.data_dir().join("filedex.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dirs() {
        let base = tempfile::tempdir().unwrap();
        let db_path = base.path().join("nested").join("catalog.db");

        let conn = open(&db_path).unwrap();
        drop(conn);

        assert!(db_path.exists());
    }

    #[test]
    fn test_open_in_memory_runs_migrations() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
