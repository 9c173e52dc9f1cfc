use std::{
    fs::File,
    path::{Path, PathBuf},
};

use tempfile::{tempdir, TempDir};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::{
    error::{LinkerError, Result},
    util::sorted_entries,
};

/// A submissions folder ready to walk. Zip exports are unpacked into a
/// temporary directory that lives as long as this value.
#[derive(Debug)]
pub struct SubmissionArchive {
    root: PathBuf,
    _extracted: Option<TempDir>,
}

impl SubmissionArchive {
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(SubmissionArchive {
                root: path.to_path_buf(),
                _extracted: None,
            });
        }
        if path.is_file() && path.extension().is_some_and(|ext| ext == "zip") {
            return Self::extract(path);
        }
        Err(LinkerError::configuration(format!(
            "archive {:?} is neither a directory nor a zipfile",
            path
        )))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn extract(zip_path: &Path) -> Result<Self> {
        info!("Extracting {:?}", zip_path);
        let file = File::open(zip_path).map_err(|e| LinkerError::io(zip_path, e))?;
        let mut zip = ZipArchive::new(file)?;
        let dest = tempdir().map_err(|e| LinkerError::io(std::env::temp_dir(), e))?;
        zip.extract(dest.path())?;

        let root = single_top_level_dir(dest.path())?.unwrap_or_else(|| dest.path().to_path_buf());
        debug!("Archive root is {:?}", root);
        Ok(SubmissionArchive {
            root,
            _extracted: Some(dest),
        })
    }
}

/// Exports are often wrapped in one folder named after the assignment.
fn single_top_level_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = sorted_entries(dir).map_err(|e| LinkerError::io(dir, e))?;
    match entries.as_slice() {
        [only] if only.is_dir() && !looks_like_submission(only) => Ok(Some(only.clone())),
        _ => Ok(None),
    }
}

fn looks_like_submission(dir: &Path) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .and_then(crate::util::trailing_id)
        .is_some()
}
