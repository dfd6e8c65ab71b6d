//! Integrity line policy
//!
//! Newer resolvers add `integrity sha...` lines to every lockfile entry.
//! If the project's own lockfiles never carried them, adding them would
//! churn the whole file, so they are stripped from resolver output. If any
//! original lockfile has them, output lines are preserved.

use crate::domain::DependencyFile;

/// Whether any original lockfile carries integrity lines
pub fn integrity_lines_in_use(files: &[DependencyFile]) -> bool {
    files
        .iter()
        .filter(|f| f.is_lockfile())
        .any(|f| f.content.contains(" integrity sha"))
}

/// Removes every integrity line from lockfile content
pub fn remove_integrity_lines(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if line.contains(" integrity sha") {
            continue;
        }
        result.push_str(line);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK_WITH_INTEGRITY: &str = "lodash@^1.3.1:\n  version \"1.3.1\"\n  resolved \"https://registry.yarnpkg.com/lodash/-/lodash-1.3.1.tgz#a4663b53686b895ff074e2ba504dfb76a8e2b770\"\n  integrity sha512-abc123==\n";

    const LOCK_WITHOUT_INTEGRITY: &str = "lodash@^1.3.1:\n  version \"1.3.1\"\n  resolved \"https://registry.yarnpkg.com/lodash/-/lodash-1.3.1.tgz#a4663b53686b895ff074e2ba504dfb76a8e2b770\"\n";

    #[test]
    fn test_integrity_lines_in_use() {
        let files = vec![
            DependencyFile::new("package.json", "{}"),
            DependencyFile::new("yarn.lock", LOCK_WITH_INTEGRITY),
        ];
        assert!(integrity_lines_in_use(&files));
    }

    #[test]
    fn test_integrity_lines_not_in_use() {
        let files = vec![DependencyFile::new("yarn.lock", LOCK_WITHOUT_INTEGRITY)];
        assert!(!integrity_lines_in_use(&files));
    }

    #[test]
    fn test_manifest_content_does_not_count() {
        let files = vec![DependencyFile::new(
            "package.json",
            "{\"description\": \" integrity sha\"}",
        )];
        assert!(!integrity_lines_in_use(&files));
    }

    #[test]
    fn test_remove_integrity_lines() {
        assert_eq!(
            remove_integrity_lines(LOCK_WITH_INTEGRITY),
            LOCK_WITHOUT_INTEGRITY
        );
    }

    #[test]
    fn test_remove_integrity_lines_no_op() {
        assert_eq!(
            remove_integrity_lines(LOCK_WITHOUT_INTEGRITY),
            LOCK_WITHOUT_INTEGRITY
        );
    }

    #[test]
    fn test_remove_preserves_missing_trailing_newline() {
        let content = "a@^1.0.0:\n  integrity sha512-xyz\n  version \"1.0.0\"";
        assert_eq!(
            remove_integrity_lines(content),
            "a@^1.0.0:\n  version \"1.0.0\""
        );
    }
}
