use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::data;
use crate::error::AppError;
use crate::models::catalog_entry::{CatalogEntry, EntryKind};
use crate::models::scan::ScanStats;
use crate::scope_path;
use crate::services::file_service::{self, RenamePolicy};
use crate::services::{query_service, scan_service};

/// Handle to one catalog database. Everything goes through an explicit
/// handle rather than globals, so tests run against independent in-memory
/// catalogs.
pub struct Catalog {
    db: Mutex<Connection>,
    scan_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    rename_policy: RenamePolicy,
}

impl Catalog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Ok(Self::from_connection(data::open(path.as_ref())?))
    }

    /// Catalog at the platform data directory (`filedex.db`).
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::from_connection(data::open(&data::default_db_path()?)?))
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Ok(Self::from_connection(data::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
            scan_locks: Mutex::new(HashMap::new()),
            rename_policy: RenamePolicy::default(),
        }
    }

    pub fn with_rename_policy(mut self, policy: RenamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // One lock per normalized directory path: two synchronize calls against
    // the same directory serialize so interleaved mark phases cannot corrupt
    // each other's sweep.
    fn scan_lock(&self, dir: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .scan_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(dir.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn synchronize(&self, directory: &str) -> Result<ScanStats, AppError> {
        let dir = scope_path::normalize(directory);
        let lock = self.scan_lock(&dir);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        scan_service::synchronize(&self.conn(), &dir)
    }

    /// Synchronize `directory` and every directory below it up to
    /// `max_depth` levels, one mark-and-sweep pass per level.
    pub fn synchronize_tree(
        &self,
        directory: &str,
        max_depth: usize,
    ) -> Result<ScanStats, AppError> {
        let dir = scope_path::normalize(directory);
        let mut stats = self.synchronize(&dir)?;
        for sub in scan_service::subdirectories(&dir, max_depth) {
            match self.synchronize(&sub) {
                Ok(sub_stats) => stats.absorb(sub_stats),
                // a subdirectory can vanish between the walk and its pass
                Err(_) => stats.errors += 1,
            }
        }
        Ok(stats)
    }

    pub fn list_children(&self, parent_path: &str) -> Result<Vec<CatalogEntry>, AppError> {
        query_service::list_children(&self.conn(), parent_path)
    }

    pub fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, AppError> {
        query_service::search(&self.conn(), query)
    }

    pub fn filter_by_category(
        &self,
        category: &str,
        scope: Option<&str>,
    ) -> Result<Vec<CatalogEntry>, AppError> {
        query_service::filter_by_category(&self.conn(), category, scope)
    }

    pub fn get_by_id(&self, id: &str) -> Result<CatalogEntry, AppError> {
        query_service::get_by_id(&self.conn(), id)
    }

    pub fn update_metadata(
        &self,
        id: &str,
        tags: &str,
        importance: &str,
    ) -> Result<CatalogEntry, AppError> {
        query_service::update_metadata(&self.conn(), id, tags, importance)
    }

    pub fn create(
        &self,
        parent_path: &str,
        name: &str,
        kind: EntryKind,
    ) -> Result<CatalogEntry, AppError> {
        file_service::create(&self.conn(), parent_path, name, kind)
    }

    pub fn rename(&self, id: &str, new_name: &str) -> Result<CatalogEntry, AppError> {
        file_service::rename(&self.conn(), self.rename_policy, id, new_name)
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        file_service::delete(&self.conn(), id)
    }
}
