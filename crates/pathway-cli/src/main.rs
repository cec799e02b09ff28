//! `pathway-tree` binary entry point

use pathway_cli::{build_cli, logging, run, GlobalOptions};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let globals = GlobalOptions::from_matches(&matches);

    if let Err(err) = logging::init(globals.verbosity, globals.log_format) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut stdout = std::io::stdout().lock();
    match run(&matches, &mut stdout).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
