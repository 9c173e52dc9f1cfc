use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use indicatif::ProgressBar;
use tracing::{debug, error, warn};

use crate::{
    error::{LinkerError, Result},
    types::Roster,
    util::{sorted_entries, trailing_id},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub folders: usize,
    pub appended: usize,
    pub missing_files: usize,
    pub unmatched: usize,
    pub unreadable: usize,
}

pub fn count_submission_folders(archive_root: &Path) -> Result<usize> {
    Ok(submission_folders(archive_root)?.len())
}

/// Appends each designated file found in a submission folder to the roster
/// record whose submission id ends the folder name. Files go in in
/// `designated` order. Missing files and unknown ids are logged and skipped.
pub fn match_submissions(
    archive_root: &Path,
    designated: &[String],
    roster: &mut Roster,
    progress: &ProgressBar,
) -> Result<MatchSummary> {
    let mut summary = MatchSummary::default();

    for folder in submission_folders(archive_root)? {
        summary.folders += 1;
        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let student = match trailing_id(&folder_name).and_then(|id| roster.get_mut(id)) {
            Some(student) => student,
            None => {
                let e = LinkerError::UnmatchedSubmission {
                    folder: folder_name,
                };
                progress.suspend(|| error!("{}", e));
                summary.unmatched += 1;
                progress.inc(1);
                continue;
            }
        };

        for file_name in designated {
            let path = folder.join(file_name);
            match fs::read(&path) {
                Ok(bytes) => {
                    student.append_source(file_name, &String::from_utf8_lossy(&bytes));
                    summary.appended += 1;
                    debug!("Linked {:?} to {}", path, student.name);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    let e = LinkerError::MissingFile {
                        file: file_name.clone(),
                        student: student.to_string(),
                    };
                    progress.suspend(|| warn!("{}", e));
                    summary.missing_files += 1;
                }
                Err(e) => {
                    let e = LinkerError::io(&path, e);
                    progress.suspend(|| error!("{}", e));
                    summary.unreadable += 1;
                }
            }
        }
        progress.inc(1);
    }

    Ok(summary)
}

fn submission_folders(archive_root: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(archive_root)
        .map_err(|e| LinkerError::io(archive_root, e))?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use indicatif::ProgressBar;

    use super::{count_submission_folders, match_submissions, MatchSummary};
    use crate::types::{Roster, StudentRecord};

    fn roster() -> Roster {
        let mut roster = Roster::default();
        roster.insert(StudentRecord::new("Ann", "Lee", 789, "123", "ann@x.edu", "01"));
        roster.insert(StudentRecord::new("Bo", "Ng", 790, "124", "bo@x.edu", "01"));
        roster
    }

    fn designated() -> Vec<String> {
        vec![String::from("main.cpp"), String::from("list.h")]
    }

    #[test]
    fn appends_in_designated_order() {
        let archive = TempDir::new().unwrap();
        archive.child("sub_789/list.h").write_str("struct List;\n").unwrap();
        archive.child("sub_789/main.cpp").write_str("int main();\n").unwrap();
        archive.child("sub_789/extra.cpp").write_str("ignored").unwrap();

        let mut roster = roster();
        let summary =
            match_submissions(archive.path(), &designated(), &mut roster, &ProgressBar::hidden())
                .unwrap();
        assert_eq!(
            summary,
            MatchSummary {
                folders: 1,
                appended: 2,
                ..Default::default()
            }
        );

        let code = &roster.get(789).unwrap().accumulated_code;
        assert!(code.starts_with("/* ----- main.cpp | Ann Lee | UIN123"));
        let main_at = code.find("int main();").unwrap();
        let list_at = code.find("/* ----- list.h | Ann Lee").unwrap();
        assert!(main_at < list_at);
        assert!(code.ends_with("struct List;\n"));
        assert!(!code.contains("ignored"));
        assert!(roster.get(790).unwrap().accumulated_code.is_empty());
    }

    #[test]
    fn unmatched_folder_changes_nothing() {
        let archive = TempDir::new().unwrap();
        archive.child("sub_999/main.cpp").write_str("int main();").unwrap();
        archive.child("not_a_number/main.cpp").write_str("int main();").unwrap();

        let mut roster = roster();
        let summary =
            match_submissions(archive.path(), &designated(), &mut roster, &ProgressBar::hidden())
                .unwrap();
        assert_eq!(summary.folders, 2);
        assert_eq!(summary.unmatched, 2);
        assert_eq!(summary.appended, 0);
        assert!(roster.sorted().iter().all(|s| !s.has_code()));
    }

    #[test]
    fn missing_file_does_not_stop_the_rest() {
        let archive = TempDir::new().unwrap();
        archive.child("sub_790/list.h").write_str("struct List;").unwrap();

        let mut roster = roster();
        let summary =
            match_submissions(archive.path(), &designated(), &mut roster, &ProgressBar::hidden())
                .unwrap();
        assert_eq!(summary.missing_files, 1);
        assert_eq!(summary.appended, 1);
        let code = &roster.get(790).unwrap().accumulated_code;
        assert!(code.starts_with("/* ----- list.h | Bo Ng"));
        assert!(!code.contains("main.cpp"));
    }

    #[test]
    fn non_utf8_submission_is_read_lossily() {
        let archive = TempDir::new().unwrap();
        archive.child("sub_789/main.cpp").write_binary(b"// caf\xe9\n").unwrap();

        let mut roster = roster();
        let summary =
            match_submissions(archive.path(), &designated(), &mut roster, &ProgressBar::hidden())
                .unwrap();
        assert_eq!(summary.appended, 1);
        assert_eq!(summary.unreadable, 0);
        let code = &roster.get(789).unwrap().accumulated_code;
        assert!(code.ends_with("// caf\u{FFFD}\n"));
    }

    #[test]
    fn loose_files_are_not_submissions() {
        let archive = TempDir::new().unwrap();
        archive.child("submission_metadata.yml").touch().unwrap();
        archive.child("sub_789").create_dir_all().unwrap();
        assert_eq!(count_submission_folders(archive.path()).unwrap(), 1);
    }
}
