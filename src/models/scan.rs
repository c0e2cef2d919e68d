use serde::{Deserialize, Serialize};

/// Counters returned by a synchronize pass. `errors` counts per-child stat
/// failures; a failed directory read surfaces as an `Err` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files: u64,
    pub directories: u64,
    pub errors: u64,
}

impl ScanStats {
    pub fn absorb(&mut self, other: ScanStats) {
        self.files += other.files;
        self.directories += other.directories;
        self.errors += other.errors;
    }
}
