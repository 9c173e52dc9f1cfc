use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::{
    error::{LinkerError, Result},
    types::{Roster, StudentRecord, SubmissionId},
};

const FIRST_NAME: usize = 0;
const LAST_NAME: usize = 1;
const SECONDARY_ID: usize = 2;
const EMAIL: usize = 3;
const SECTION: usize = 4;
const SUBMISSION_ID: usize = 8;

pub fn load_roster(path: &Path, graded_marker: &str) -> Result<Roster> {
    if !path.is_file() {
        return Err(LinkerError::configuration(format!(
            "roster file {:?} does not exist",
            path
        )));
    }
    let file = File::open(path).map_err(|e| LinkerError::io(path, e))?;
    let roster = read_roster(file, graded_marker)?;
    if roster.is_empty() {
        return Err(LinkerError::EmptyRoster {
            path: path.to_path_buf(),
        });
    }
    Ok(roster)
}

/// Parses every row carrying `graded_marker`. The header row is skipped.
/// Later rows with an already seen submission id replace the earlier one.
pub fn read_roster<R: Read>(reader: R, graded_marker: &str) -> Result<Roster> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut roster = Roster::default();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;
        if !row.iter().any(|field| field.contains(graded_marker)) {
            continue;
        }
        let Some(record) = parse_row(&row, line) else {
            continue;
        };
        debug!("Roster line {}: {}", line, record);
        if let Some(previous) = roster.insert(record) {
            warn!(
                "Duplicate submission id {} on line {}; replacing {}",
                previous.submission_id, line, previous.name
            );
        }
    }
    Ok(roster)
}

fn parse_row(row: &StringRecord, line: usize) -> Option<StudentRecord> {
    let Some(raw_id) = row.get(SUBMISSION_ID) else {
        warn!(
            "Skipping roster line {}: expected at least {} columns, found {}",
            line,
            SUBMISSION_ID + 1,
            row.len()
        );
        return None;
    };
    let submission_id = match raw_id.trim().parse::<SubmissionId>() {
        Ok(id) => id,
        Err(_) => {
            warn!(
                "Skipping roster line {}: submission id '{}' is not a number",
                line, raw_id
            );
            return None;
        }
    };
    let field = |i: usize| row.get(i).unwrap_or_default();
    Some(StudentRecord::new(
        field(FIRST_NAME),
        field(LAST_NAME),
        submission_id,
        field(SECONDARY_ID),
        field(EMAIL),
        field(SECTION),
    ))
}
