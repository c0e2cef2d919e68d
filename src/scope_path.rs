pub fn normalize(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

pub fn join_child(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(normalize("/foo/bar/"), "/foo/bar");
        assert_eq!(normalize("/foo/bar///"), "/foo/bar");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize("C:\\Users\\test"), "C:/Users/test");
    }

    #[test]
    fn normalize_collapses_drive_root_forms() {
        assert_eq!(normalize("C:"), normalize("C:\\"));
        assert_eq!(normalize("C:"), normalize("C:/"));
    }

    #[test]
    fn join_child_inserts_single_separator() {
        assert_eq!(join_child("/foo/bar", "baz.txt"), "/foo/bar/baz.txt");
        assert_eq!(join_child("/foo/bar/", "baz.txt"), "/foo/bar/baz.txt");
        assert_eq!(join_child("/", "etc"), "/etc");
    }

}
