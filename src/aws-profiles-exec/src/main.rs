use aws_profiles_exec::cli::{self, Args, Outcome};
use aws_profiles_exec::logging;
use clap::Parser;
use log::error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_file) {
        eprintln!("👎 {e:#}");
        return ExitCode::FAILURE;
    }

    match cli::run(args).await {
        Ok(Outcome::Usage) => ExitCode::SUCCESS,
        Ok(Outcome::Completed(report)) if report.is_success() => ExitCode::SUCCESS,
        Ok(Outcome::Completed(_)) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
