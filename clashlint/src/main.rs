use crate::cli::SubCommand;
use clap::Parser;
use std::process::ExitCode;

mod cli;

#[derive(Debug, Parser)]
#[command(name = "clashlint", about = "Validate and repair Clash configurations")]
pub(crate) struct ProgramArgs {
    /// Raise log verbosity; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub cmd: SubCommand,
}

fn main() -> ExitCode {
    let args: ProgramArgs = ProgramArgs::parse();
    if let Err(err) = clashlint::external::init_tracing(args.verbose, args.log_json) {
        eprintln!("Failed to initialize logger: {}", err);
        return ExitCode::FAILURE;
    }
    match cli::run(args.cmd) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error occurred: {}", err);
            ExitCode::FAILURE
        }
    }
}
