//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Normalize a host URL for prefixing attachment links.
///
/// Uses `url` crate for parsing. Query strings and fragments are dropped,
/// the path is kept without its trailing slash.
///
/// Returns `None` if the URL is invalid or has no host
///
/// # Examples
/// ```ignore
/// normalize_host("https://cdn.example.com/")      -> Some("https://cdn.example.com")
/// normalize_host("https://example.com/static?x")  -> Some("https://example.com/static")
/// normalize_host("cdn.example.com")               -> None
/// ```
pub fn normalize_host(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str.trim()).ok()?;
    let host = parsed.host_str()?;

    let mut out = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        out.push_str(&format!(":{port}"));
    }
    let path = parsed.path().trim_end_matches('/');
    out.push_str(path);
    Some(out)
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/notes/journal/   ← cwd
/// /home/user/notes/notepress.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("https://cdn.example.com/"),
            Some("https://cdn.example.com".to_string())
        );
        assert_eq!(
            normalize_host("https://example.com/static/?v=1#x"),
            Some("https://example.com/static".to_string())
        );
        assert_eq!(
            normalize_host("http://localhost:8080"),
            Some("http://localhost:8080".to_string())
        );
        assert_eq!(normalize_host("cdn.example.com"), None);
        assert_eq!(normalize_host("not a url"), None);
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notepress.toml");
        assert_eq!(find_config_file(&path), None);

        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }
}
