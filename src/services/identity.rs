use crate::scope_path;

/// Derive the stable catalog id for an absolute path. Pure function: the
/// path is normalized (separator and trailing-slash variants collapse into
/// one form) and hashed, so the same physical location always yields the
/// same id and a rename necessarily mints a new one.
pub fn resolve_id(path: &str) -> String {
    let normalized = scope_path::normalize(path);
    blake3::hash(normalized.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_id_is_deterministic() {
        let a = resolve_id("/home/user/docs");
        let b = resolve_id("/home/user/docs");
        assert_eq!(a, b);
    }

    #[test]
    fn resolve_id_canonicalizes_separator_variants() {
        assert_eq!(resolve_id("C:"), resolve_id("C:\\"));
        assert_eq!(resolve_id("/home/user/docs"), resolve_id("/home/user/docs/"));
        assert_eq!(
            resolve_id("C:\\Users\\test"),
            resolve_id("C:/Users/test")
        );
    }

    #[test]
    fn resolve_id_distinguishes_paths() {
        assert_ne!(resolve_id("/home/user/a"), resolve_id("/home/user/b"));
        assert_ne!(resolve_id("/home/user"), resolve_id("/home/user2"));
    }

    #[test]
    fn resolve_id_is_hex() {
        let id = resolve_id("/somewhere");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
