use std::path::{Component, Path};

/// Normalize a stored path to the forward-slash, root-relative form used as
/// the identity key: `\` becomes `/`, leading `/` and `./` are dropped.
pub fn normalize_relative(path: &str) -> String {
    let mut p = path.trim().replace('\\', "/");
    loop {
        if let Some(rest) = p.strip_prefix("./") {
            p = rest.to_string();
        } else if let Some(rest) = p.strip_prefix('/') {
            p = rest.to_string();
        } else {
            break;
        }
    }
    p
}

/// Root-relative key for an on-disk path. Returns `None` when `path` is not under `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let key = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Final path segment.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Everything before the final segment; empty for files in the root.
pub fn folder_of(key: &str) -> &str {
    key.rsplit_once('/').map(|(folder, _)| folder).unwrap_or("")
}

/// Extension exactly as written (case preserved), empty when there is none.
/// Dotfiles such as `.htaccess` have no extension.
pub fn raw_extension(key: &str) -> &str {
    let name = file_name(key);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx + 1..],
    }
}

pub fn lower_extension(key: &str) -> String {
    raw_extension(key).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize_relative("/a/cat.jpg"), "a/cat.jpg");
        assert_eq!(normalize_relative("./a/cat.jpg"), "a/cat.jpg");
        assert_eq!(normalize_relative("a\\b\\dog.png"), "a/b/dog.png");
        assert_eq!(normalize_relative("//x.txt"), "x.txt");
    }

    #[test]
    fn test_relative_key() {
        let root = PathBuf::from("/srv/assets");
        assert_eq!(
            relative_key(&root, &root.join("a").join("cat.JPG")),
            Some("a/cat.JPG".to_string())
        );
        assert_eq!(relative_key(&root, &root), None);
        assert_eq!(relative_key(&root, Path::new("/elsewhere/x")), None);
    }

    #[test]
    fn test_path_parts() {
        assert_eq!(file_name("a/b/cat.JPG"), "cat.JPG");
        assert_eq!(folder_of("a/b/cat.JPG"), "a/b");
        assert_eq!(folder_of("cat.JPG"), "");
        assert_eq!(raw_extension("a/cat.JPG"), "JPG");
        assert_eq!(lower_extension("a/cat.JPG"), "jpg");
        assert_eq!(raw_extension("a/.htaccess"), "");
        assert_eq!(raw_extension("a/README"), "");
        assert_eq!(raw_extension("a.b/README"), "");
    }
}
