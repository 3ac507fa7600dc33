use std::process::ExitCode;

use human_panic::setup_panic;
use log::error;

use versioned_minify::cli::{get_log_file, get_matches, get_verbosity};
use versioned_minify::prelude::*;

fn main() -> ExitCode {
    setup_panic!();

    let matches = get_matches();

    let log_file = match get_log_file(&matches) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logger(get_verbosity(&matches), log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match perform_runs_based_on_arguments(&matches) {
        Ok(0) => ExitCode::SUCCESS,
        // Every stage finished but errors were logged
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
