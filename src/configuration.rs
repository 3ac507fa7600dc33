use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use log::info;

use crate::cli::config_from_matches;
use crate::config::{Config, load_config, read_or_create};
use crate::logging::format_message;
use crate::workflow::{Pipeline, RunStatus};

/// Collects the jobs from the flags, or from the config file without `--source`
///
/// # Errors
/// Returns an error if neither describes a valid run
pub fn configurations_from_arguments(argument_matches: &ArgMatches) -> Result<Vec<Config>> {
    if let Some(config) = config_from_matches(argument_matches)? {
        return Ok(vec![config]);
    }

    let configuration_file_path = PathBuf::from(
        argument_matches
            .get_one::<String>("config")
            .ok_or_else(|| anyhow!("Configuration file option not found"))?,
    );
    let configuration_file = read_or_create(configuration_file_path)?;

    if !configuration_file.exists() {
        return Err(anyhow!(
            "No --source given and configuration file {} not found",
            configuration_file.display()
        ));
    }

    load_config(&configuration_file)
}

/// Runs every job and prints its report
///
/// # Returns
/// * `Result<usize>` - The number of warnings over all jobs
///
/// # Errors
/// Returns an error on the first job that fails outright
pub fn perform_runs_based_on_arguments(argument_matches: &ArgMatches) -> Result<usize> {
    let configurations = configurations_from_arguments(argument_matches)?;
    let dump_errors = argument_matches.get_flag("dump_errors");
    let mut warnings = 0;

    for configuration in configurations {
        info!(
            "Starting minification of the {} files",
            configuration.asset_type()
        );

        let report = Pipeline::new(configuration).run()?;
        println!("{report}");

        if dump_errors && report.log.has_errors() {
            println!("{}", report.log.error_dump()?);
        }

        if let RunStatus::SucceededWithWarnings(count) = report.status {
            warnings += count;
        }
    }

    let message = match warnings {
        0 => "Finished without errors".to_string(),
        count => format!("Finished with {count} error(s) logged"),
    };
    let colored_message = match warnings {
        0 => message.green().bold().to_string(),
        _ => message.yellow().bold().to_string(),
    };
    println!("{}", format_message(&message, &colored_message));

    Ok(warnings)
}
