use std::fs::{self, create_dir};
use std::io::{ErrorKind, Result};
use std::path::{Path, PathBuf};

use crate::types::SubmissionId;

/// Directory entries sorted by file name, so runs don't depend on the order
/// the filesystem hands them back in.
pub fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Creates `parent/base`, or `parent/base(0)`, `parent/base(1)`, ... for the
/// first name that isn't taken. Never reuses an existing directory.
pub fn create_first_free_dir(parent: &Path, base: &str) -> Result<PathBuf> {
    let mut candidate = parent.join(base);
    let mut suffix: u64 = 0;
    loop {
        match create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                candidate = parent.join(format!("{}({})", base, suffix));
                suffix += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// "submission_123456" -> Some(123456)
pub fn trailing_id(folder_name: &str) -> Option<SubmissionId> {
    folder_name.trim().rsplit('_').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    use super::{create_first_free_dir, sorted_entries, trailing_id};

    #[test]
    fn first_free_dir_suffixes() {
        let parent = TempDir::new().unwrap();
        let names: Vec<String> = (0..4)
            .map(|_| {
                create_first_free_dir(parent.path(), "Ann_Lee")
                    .unwrap()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["Ann_Lee", "Ann_Lee(0)", "Ann_Lee(1)", "Ann_Lee(2)"]);
    }

    #[test]
    fn first_free_dir_skips_existing_files() {
        let parent = TempDir::new().unwrap();
        parent.child("out").touch().unwrap();
        parent.child("out(0)").create_dir_all().unwrap();
        let dir = create_first_free_dir(parent.path(), "out").unwrap();
        assert_eq!(dir, parent.path().join("out(1)"));
        assert!(dir.is_dir());
    }

    #[test]
    fn first_free_dir_reports_missing_parent() {
        let parent = TempDir::new().unwrap();
        assert!(create_first_free_dir(&parent.path().join("nope"), "out").is_err());
    }

    #[test]
    fn entries_are_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.h", "a.cpp", "c.cpp"] {
            dir.child(name).touch().unwrap();
        }
        let names: Vec<String> = sorted_entries(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.cpp", "b.h", "c.cpp"]);
    }

    #[test]
    fn trailing_ids() {
        assert_eq!(trailing_id("submission_789"), Some(789));
        assert_eq!(trailing_id("sub_a_b_12 "), Some(12));
        assert_eq!(trailing_id("42"), Some(42));
        assert_eq!(trailing_id("submission_"), None);
        assert_eq!(trailing_id("submission_x1"), None);
    }
}
