use std::{
    fs::{self, OpenOptions},
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{ARCHIVE_PREFIX, GRADED_MARKER, ROSTER_PREFIX, SETTINGS_FILE, STARTER_DIR},
    error::{LinkerError, Result},
};

/// Any subset of the run inputs. Used both for the JSON settings file and
/// for the values given on the command line.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub archive: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub starter: Option<PathBuf>,
    pub output_parent: Option<PathBuf>,
    pub graded_marker: Option<String>,
}

impl Settings {
    /// Fields set in `self` win over `other`.
    fn or(self, other: Settings) -> Settings {
        Settings {
            archive: self.archive.or(other.archive),
            roster: self.roster.or(other.roster),
            starter: self.starter.or(other.starter),
            output_parent: self.output_parent.or(other.output_parent),
            graded_marker: self.graded_marker.or(other.graded_marker),
        }
    }

    fn relative_to(self, root: &Path) -> Settings {
        Settings {
            archive: self.archive.map(|p| root.join(p)),
            roster: self.roster.map(|p| root.join(p)),
            starter: self.starter.map(|p| root.join(p)),
            output_parent: self.output_parent.map(|p| root.join(p)),
            graded_marker: self.graded_marker,
        }
    }
}

pub fn read_settings(path: &Path) -> Result<Settings> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| LinkerError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LinkerError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Inputs for one run after command line, settings file and auto-detection
/// have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkerConfig {
    pub archive: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub starter: Option<PathBuf>,
    pub output_parent: PathBuf,
    pub graded_marker: String,
}

impl LinkerConfig {
    pub fn archive(&self) -> Result<&Path> {
        self.archive.as_deref().ok_or_else(|| {
            LinkerError::configuration(format!(
                "no archive given and no '{}*' entry found",
                ARCHIVE_PREFIX
            ))
        })
    }

    pub fn roster(&self) -> Result<&Path> {
        self.roster.as_deref().ok_or_else(|| {
            LinkerError::configuration(format!(
                "no roster given and no '{}*.csv' file found",
                ROSTER_PREFIX
            ))
        })
    }

    pub fn starter(&self) -> Result<&Path> {
        self.starter.as_deref().ok_or_else(|| {
            LinkerError::configuration(format!(
                "no starter directory given and no '{}' directory found",
                STARTER_DIR
            ))
        })
    }
}

/// Precedence per field: command line, then the settings file, then whatever
/// can be found by name in `root`.
pub fn resolve(root: &Path, cli: Settings, settings_file: Option<&Path>) -> Result<LinkerConfig> {
    if !root.is_dir() {
        return Err(LinkerError::configuration(format!(
            "root {:?} is not a directory",
            root
        )));
    }

    let from_file = match settings_file {
        Some(path) => read_settings(path)?,
        None => {
            let default_path = root.join(SETTINGS_FILE);
            if default_path.is_file() {
                debug!("Reading settings from {:?}", default_path);
                read_settings(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    let merged = cli
        .or(from_file.relative_to(root))
        .or(auto_detect(root)?);

    Ok(LinkerConfig {
        archive: merged.archive,
        roster: merged.roster,
        starter: merged.starter,
        output_parent: merged.output_parent.unwrap_or_else(|| root.to_path_buf()),
        graded_marker: merged
            .graded_marker
            .unwrap_or_else(|| GRADED_MARKER.to_string()),
    })
}

fn auto_detect(root: &Path) -> Result<Settings> {
    let mut entries: Vec<PathBuf> = fs::read_dir(root)
        .map_err(|e| LinkerError::io(root, e))?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut detected = Settings::default();
    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let name = name.trim();
        if detected.archive.is_none()
            && name.starts_with(ARCHIVE_PREFIX)
            && (path.is_dir() || name.ends_with(".zip"))
        {
            debug!("Detected archive {:?}", path);
            detected.archive = Some(path.clone());
        } else if detected.roster.is_none()
            && name.starts_with(ROSTER_PREFIX)
            && name.ends_with(".csv")
            && path.is_file()
        {
            debug!("Detected roster {:?}", path);
            detected.roster = Some(path.clone());
        } else if detected.starter.is_none() && name == STARTER_DIR && path.is_dir() {
            detected.starter = Some(path.clone());
        }
    }
    Ok(detected)
}
