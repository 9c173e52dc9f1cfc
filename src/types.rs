use std::{collections::HashMap, fmt, path::Path, str::FromStr};

use strum::{AsRefStr, Display, EnumString};

pub type SubmissionId = u64;

/// Extensions that mark a starter file as source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SourceExtension {
    Cpp,
    H,
}

impl SourceExtension {
    pub fn of(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_str(ext).ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    pub submission_id: SubmissionId,
    pub secondary_id: String,
    pub email: String,
    pub section: String,
    pub accumulated_code: String,
}

impl StudentRecord {
    pub fn new(
        first: &str,
        last: &str,
        submission_id: SubmissionId,
        secondary_id: &str,
        email: &str,
        section: &str,
    ) -> Self {
        StudentRecord {
            name: format!("{} {}", first.trim(), last.trim()),
            submission_id,
            secondary_id: secondary_id.trim().to_string(),
            email: email.trim().to_string(),
            section: section.trim().to_string(),
            accumulated_code: String::new(),
        }
    }

    /// Appends one submitted file, headed by the file name and this record's
    /// descriptive line.
    pub fn append_source(&mut self, file_name: &str, contents: &str) {
        let header = format!("/* ----- {} | {} ----- */\n\n", file_name, self);
        self.accumulated_code.push_str(&header);
        self.accumulated_code.push_str(contents);
    }

    pub fn has_code(&self) -> bool {
        !self.accumulated_code.is_empty()
    }
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section = if self.section.is_empty() {
            "N/A"
        } else {
            self.section.as_str()
        };
        write!(
            f,
            "{} | UIN{} | {} | {} | Submission ID: {}",
            self.name, self.secondary_id, self.email, section, self.submission_id
        )
    }
}

/// Student records keyed by submission id.
#[derive(Debug, Default)]
pub struct Roster {
    students: HashMap<SubmissionId, StudentRecord>,
}

impl Roster {
    /// Returns the record that was replaced, if any.
    pub fn insert(&mut self, record: StudentRecord) -> Option<StudentRecord> {
        self.students.insert(record.submission_id, record)
    }

    #[cfg(test)]
    pub fn get(&self, id: SubmissionId) -> Option<&StudentRecord> {
        self.students.get(&id)
    }

    pub fn get_mut(&mut self, id: SubmissionId) -> Option<&mut StudentRecord> {
        self.students.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Records ordered by submission id.
    pub fn sorted(&self) -> Vec<&StudentRecord> {
        let mut students: Vec<&StudentRecord> = self.students.values().collect();
        students.sort_by_key(|s| s.submission_id);
        students
    }
}

/// Combined starter code plus the file names every submission is searched for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarterBundle {
    pub designated: Vec<String>,
    pub text: String,
}
