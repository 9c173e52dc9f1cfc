use chrono::Local;
use tracing::error;

use crate::{
    linker_config::LinkerConfig, pipeline, progress::Progress, roster::load_roster,
};

pub fn link(config: &LinkerConfig, progress: Progress) -> bool {
    match pipeline::run(config, Local::now().date_naive(), progress) {
        Ok(summary) => {
            if summary.output.failed > 0 {
                eprintln!("{} students could not be written", summary.output.failed);
            }
            println!("\nSummary:\n\t{}", summary.summarize());
            true
        }
        Err(e) => {
            error!("{}", e);
            if e.is_fatal() {
                eprintln!("EXITING...");
            }
            false
        }
    }
}

pub fn list_students(config: &LinkerConfig) -> bool {
    let roster = match config
        .roster()
        .and_then(|path| load_roster(path, &config.graded_marker))
    {
        Ok(roster) => roster,
        Err(e) => {
            error!("{}", e);
            return false;
        }
    };
    for student in roster.sorted() {
        println!("{}", student);
    }
    true
}
