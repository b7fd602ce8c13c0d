//! Host environment helpers.

use std::ffi::OsString;
use std::path::Path;

/// Check if running in a CI environment.
///
/// Used to force the plain, non-interactive UI in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Build a PATH value with `dir` in front of `current`.
///
/// Entries of `current` equal to `dir` are dropped so the result never
/// lists the directory twice.
pub fn path_with_prepended(dir: &Path, current: Option<OsString>) -> OsString {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current).filter(|p| p != dir));
    }
    // join_paths only fails on entries containing the separator; fall back
    // to the directory alone rather than losing it.
    std::env::join_paths(&entries).unwrap_or_else(|_| dir.as_os_str().to_os_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }

    #[test]
    fn prepended_dir_comes_first() {
        let current = std::env::join_paths([PathBuf::from("/usr/bin"), PathBuf::from("/bin")])
            .unwrap();
        let joined = path_with_prepended(Path::new("/work/venv/bin"), Some(current));
        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(entries[0], PathBuf::from("/work/venv/bin"));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn prepended_dir_is_not_duplicated() {
        let current =
            std::env::join_paths([PathBuf::from("/work/venv/bin"), PathBuf::from("/bin")])
                .unwrap();
        let joined = path_with_prepended(Path::new("/work/venv/bin"), Some(current));
        let entries: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(
            entries,
            vec![PathBuf::from("/work/venv/bin"), PathBuf::from("/bin")]
        );
    }

    #[test]
    fn missing_path_yields_dir_only() {
        let joined = path_with_prepended(Path::new("/work/venv/bin"), None);
        assert_eq!(joined, OsString::from("/work/venv/bin"));
    }
}
