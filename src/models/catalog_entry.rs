use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            _ => Err(format!("unknown entry kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[default]
    Normal,
    Low,
    Medium,
    High,
}

impl Importance {
    /// Sort weight for "most important first" orderings. The stored values
    /// are plain strings, so ordering has to go through this rank rather
    /// than lexicographic comparison.
    pub fn rank(&self) -> i64 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Normal => 1,
            Self::Low => 0,
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown importance: {s}")),
        }
    }
}

/// One row of the catalog. `id` is derived from `path`, so a rename always
/// retires the old id and mints a new one. `tags` and `importance` belong to
/// the user and survive rescans; everything else mirrors the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: i64,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub parent_path: String,
    pub tags: String,
    pub importance: Importance,
    pub last_scanned: i64,
}
