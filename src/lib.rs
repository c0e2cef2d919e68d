pub mod catalog;
pub mod data;
pub mod error;
pub mod locations;
pub mod logging;
pub mod models;
pub(crate) mod scope_path;
pub mod services;

pub use catalog::Catalog;
pub use error::AppError;
pub use models::catalog_entry::{CatalogEntry, EntryKind, Importance};
pub use models::category::Category;
pub use models::scan::ScanStats;
pub use services::file_service::RenamePolicy;
