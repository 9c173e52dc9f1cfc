use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use indicatif::ProgressBar;
use tracing::{debug, error};

use crate::{
    config::{normalized_name, output_root_name, starter_bundle_file, student_source_file},
    error::{LinkerError, Result},
    types::{Roster, StarterBundle, StudentRecord},
    util::create_first_free_dir,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub root: PathBuf,
    pub written: usize,
    pub failed: usize,
}

pub fn create_output_root(parent: &Path, date: NaiveDate) -> Result<PathBuf> {
    let base = output_root_name(date);
    create_first_free_dir(parent, &base).map_err(|e| LinkerError::io(parent.join(base), e))
}

/// Writes the starter bundle and one folder per student with code into a new
/// output root under `parent`. A student that fails to write is logged and
/// skipped.
pub fn materialize(
    parent: &Path,
    date: NaiveDate,
    starter: &StarterBundle,
    roster: &Roster,
    progress: &ProgressBar,
) -> Result<MaterializeSummary> {
    let root = create_output_root(parent, date)?;
    let starter_file = starter_bundle_file(&root);
    fs::write(&starter_file, &starter.text).map_err(|e| LinkerError::io(&starter_file, e))?;

    let mut summary = MaterializeSummary {
        root,
        written: 0,
        failed: 0,
    };

    for student in roster.sorted() {
        if !student.has_code() {
            progress.inc(1);
            continue;
        }
        match write_student(&summary.root, student) {
            Ok(path) => {
                debug!("Wrote {:?}", path);
                summary.written += 1;
            }
            Err(e) => {
                progress.suspend(|| error!("{}", e));
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    Ok(summary)
}

fn write_student(root: &Path, student: &StudentRecord) -> Result<PathBuf> {
    let normalized = normalized_name(&student.name);
    let as_write_error = |source| LinkerError::Write {
        student: student.to_string(),
        source,
    };
    let dir = create_first_free_dir(root, &normalized).map_err(as_write_error)?;
    let file = student_source_file(&dir, &normalized, student.submission_id);
    fs::write(&file, &student.accumulated_code).map_err(as_write_error)?;
    Ok(file)
}
