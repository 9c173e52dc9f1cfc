use chrono::NaiveDate;
use indicatif::ProgressBar;
use tracing::info;

use crate::{
    archive::SubmissionArchive,
    error::Result,
    linker_config::LinkerConfig,
    matcher::{count_submission_folders, match_submissions, MatchSummary},
    materialize::{materialize, MaterializeSummary},
    progress::Progress,
    roster::load_roster,
    starter::build_starter_bundle,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: MatchSummary,
    pub output: MaterializeSummary,
}

impl RunSummary {
    pub fn summarize(&self) -> String {
        format!(
            "{} submission folders processed, {} PII-linked files written to {}",
            self.matched.folders,
            self.output.written,
            self.output.root.display()
        )
    }
}

/// roster -> starter bundle -> match submissions -> write output. The first
/// fatal error ends the run; whatever was already written stays.
pub fn run(config: &LinkerConfig, today: NaiveDate, progress: Progress) -> Result<RunSummary> {
    let mut roster = with_spinner(progress.spinner("Building student roster..."), || {
        load_roster(config.roster()?, &config.graded_marker)
    })?;
    info!("Roster built: {} graded students", roster.len());

    let starter = with_spinner(progress.spinner("Combining starter code..."), || {
        build_starter_bundle(config.starter()?)
    })?;
    info!("Starter files: {}", starter.designated.join(", "));

    let archive = SubmissionArchive::open(config.archive()?)?;
    let folders = count_submission_folders(archive.root())?;
    let bar = progress.bar(folders as u64, "Extracting student code");
    let matched = match_submissions(archive.root(), &starter.designated, &mut roster, &bar)?;
    bar.finish_and_clear();
    info!(
        "Code extracted and linked: {} files, {} missing, {} unreadable, {} unmatched folders",
        matched.appended, matched.missing_files, matched.unreadable, matched.unmatched
    );

    let bar = progress.bar(roster.len() as u64, "Generating PII-linked folder");
    let output = materialize(&config.output_parent, today, &starter, &roster, &bar)?;
    bar.finish_and_clear();
    info!("Folder generation complete: {:?}", output.root);

    Ok(RunSummary { matched, output })
}

/// Clears the spinner whether or not the phase succeeded.
fn with_spinner<T>(spinner: ProgressBar, phase: impl FnOnce() -> Result<T>) -> Result<T> {
    let result = phase();
    spinner.finish_and_clear();
    result
}
