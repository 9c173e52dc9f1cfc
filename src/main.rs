use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

mod archive;
mod commands;
mod config;
mod error;
mod linker_config;
mod logging;
mod matcher;
mod materialize;
mod pipeline;
mod progress;
mod roster;
mod starter;
mod types;
mod util;

use linker_config::{resolve, Settings};
use progress::Progress;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: SubCommand,

    /// More output per occurrence (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Link every submission in the archive to its roster entry and write the output folder
    Link {
        #[command(flatten)]
        inputs: Inputs,
        /// Don't draw progress bars
        #[arg(long)]
        no_progress: bool,
    },
    /// Print every graded student in the roster
    ListStudents {
        #[command(flatten)]
        inputs: Inputs,
    },
}

#[derive(ClapArgs, Debug)]
struct Inputs {
    /// Directory searched for Archive_*, SID_*.csv, Starter and pii_linker.json
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,
    /// Submissions export, either a directory or a .zip
    #[arg(long)]
    archive: Option<Utf8PathBuf>,
    /// Roster CSV exported from the grading platform
    #[arg(long)]
    roster: Option<Utf8PathBuf>,
    /// Directory with the assignment's starter .cpp/.h files
    #[arg(long)]
    starter: Option<Utf8PathBuf>,
    /// Where the PIILinked_* folder is created
    #[arg(long)]
    output: Option<Utf8PathBuf>,
    /// Status text a roster row must contain to be included
    #[arg(long)]
    marker: Option<String>,
    /// JSON settings file (defaults to <root>/pii_linker.json when present)
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

impl Inputs {
    fn resolve(self) -> error::Result<linker_config::LinkerConfig> {
        let cli = Settings {
            archive: self.archive.map(Utf8PathBuf::into_std_path_buf),
            roster: self.roster.map(Utf8PathBuf::into_std_path_buf),
            starter: self.starter.map(Utf8PathBuf::into_std_path_buf),
            output_parent: self.output.map(Utf8PathBuf::into_std_path_buf),
            graded_marker: self.marker,
        };
        resolve(
            self.root.as_std_path(),
            cli,
            self.config.as_ref().map(|c| c.as_std_path()),
        )
    }
}

fn main() -> ExitCode {
    let cli = Args::parse();
    logging::init_logging(cli.verbose);

    let ok = match cli.command {
        SubCommand::Link {
            inputs,
            no_progress,
        } => match inputs.resolve() {
            Ok(config) => commands::link(&config, Progress::new(!no_progress)),
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        },
        SubCommand::ListStudents { inputs } => match inputs.resolve() {
            Ok(config) => commands::list_students(&config),
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        },
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
