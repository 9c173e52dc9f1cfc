use std::path::PathBuf;

use thiserror::Error;

/// Everything the linker can report. `Configuration`, `EmptyRoster` and the
/// wrapped library errors end a run; the rest are logged where they happen
/// and the batch carries on.
#[derive(Debug, Error)]
pub enum LinkerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no graded rows found in roster {path:?}")]
    EmptyRoster { path: PathBuf },

    #[error("missing {file} for: {student}")]
    MissingFile { file: String, student: String },

    #[error("no roster entry for submission folder '{folder}'")]
    UnmatchedSubmission { folder: String },

    #[error("failed to write output for {student}: {source}")]
    Write {
        student: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read settings file {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, LinkerError>;

impl LinkerError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Fatal errors stop the pipeline. Everything else is recovered per file
    /// or per student.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MissingFile { .. } | Self::UnmatchedSubmission { .. } | Self::Write { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LinkerError;

    #[test]
    fn only_batch_errors_are_recoverable() {
        assert!(LinkerError::configuration("no starter").is_fatal());
        assert!(LinkerError::EmptyRoster { path: "SID_x.csv".into() }.is_fatal());
        assert!(!LinkerError::UnmatchedSubmission { folder: "sub_1".into() }.is_fatal());
        assert!(!LinkerError::MissingFile {
            file: "main.cpp".into(),
            student: "Ann Lee".into()
        }
        .is_fatal());
    }

    #[test]
    fn write_error_names_the_student() {
        let e = LinkerError::Write {
            student: "Ann Lee".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "failed to write output for Ann Lee: denied");
    }
}
