use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::types::{SourceExtension, SubmissionId};

pub const GRADED_MARKER: &str = "Graded";
pub const SETTINGS_FILE: &str = "pii_linker.json";
pub const ARCHIVE_PREFIX: &str = "Archive_";
pub const ROSTER_PREFIX: &str = "SID_";
pub const STARTER_DIR: &str = "Starter";
pub const OUTPUT_EXTENSION: SourceExtension = SourceExtension::Cpp;

pub fn output_root_name(date: NaiveDate) -> String {
    format!("PIILinked_{}", date.format("%Y_%m_%d"))
}

pub fn starter_bundle_file(output_root: &Path) -> PathBuf {
    output_root.join(format!("0_STARTER.{}", OUTPUT_EXTENSION))
}

/// "Ann  Lee" -> "Ann_Lee". Path separators become `_` and a name made only
/// of dots is replaced, so the result is always one plain path component.
pub fn normalized_name(name: &str) -> String {
    let joined = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "_");
    if joined.chars().all(|c| c == '.') {
        return "_".repeat(joined.len().max(1));
    }
    joined
}

pub fn student_source_file(student_dir: &Path, normalized: &str, id: SubmissionId) -> PathBuf {
    student_dir.join(format!("{}_{}.{}", normalized, id, OUTPUT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn output_paths() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 9).unwrap();
        assert_eq!(output_root_name(date), "PIILinked_2023_04_09");
        assert_eq!(
            starter_bundle_file(Path::new("out")),
            Path::new("out").join("0_STARTER.cpp")
        );
        assert_eq!(
            student_source_file(Path::new("Ann_Lee(0)"), "Ann_Lee", 789),
            Path::new("Ann_Lee(0)").join("Ann_Lee_789.cpp")
        );
    }

    #[test]
    fn name_normalization() {
        assert_eq!(normalized_name("Ann Lee"), "Ann_Lee");
        assert_eq!(normalized_name(" Mary  Jo Smith "), "Mary_Jo_Smith");
        assert_eq!(normalized_name("../escaped Lee"), ".._escaped_Lee");
        assert_eq!(normalized_name("a\\b/c"), "a_b_c");
        assert_eq!(normalized_name(".."), "__");
        assert_eq!(normalized_name(""), "_");
    }
}
