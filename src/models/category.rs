use serde::{Deserialize, Serialize};

/// Semantic file grouping used by the category filter. Each category maps to
/// a fixed set of extension suffixes matched against entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Documents,
    Images,
    Videos,
    Audio,
    Archives,
}

impl Category {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Documents => &[
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "csv", "rtf",
                "odt",
            ],
            Self::Images => &[
                "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "heic", "tiff",
            ],
            Self::Videos => &["mp4", "mov", "avi", "mkv", "webm", "wmv", "m4v"],
            Self::Audio => &["mp3", "wav", "flac", "m4a", "aac", "ogg", "wma"],
            Self::Archives => &["zip", "rar", "7z", "tar", "gz", "bz2", "xz", "dmg", "iso"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Documents => write!(f, "documents"),
            Self::Images => write!(f, "images"),
            Self::Videos => write!(f, "videos"),
            Self::Audio => write!(f, "audio"),
            Self::Archives => write!(f, "archives"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents" => Ok(Self::Documents),
            "images" => Ok(Self::Images),
            "videos" => Ok(Self::Videos),
            "audio" => Ok(Self::Audio),
            "archives" => Ok(Self::Archives),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}
