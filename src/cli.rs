use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{
    Arg, ArgAction, ArgMatches, Command, command, crate_authors, crate_description, crate_name,
    crate_version,
};

use crate::config::{AssetType, Config, expand_path, parse_octal_mode};
use crate::constants::{
    CONFIG_HELP, DEFAULT_CONFIG_PATH, LOCAL_LOGGING_HELP, LOG_FILE_DEFAULT, LOG_FILE_HELP,
    VERBOSE_HELP,
};
use crate::logging::LogLevel;
use crate::utils::find_project_folder;

/// Defines the command line
///
/// A run is described either by `--source`, `--tag` and `--type` plus the
/// optional tuning flags, or by a config file listing one or more jobs.
pub fn build_command() -> Command {
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .default_value(DEFAULT_CONFIG_PATH);

    let arg_source = Arg::new("source")
        .short('s')
        .long("source")
        .help("Folder holding the assets, e.g. ~/site/public/css")
        .requires_all(["tag", "type"]);

    let arg_tag = Arg::new("tag")
        .short('t')
        .long("tag")
        .help("Version inserted into the destination path");

    let arg_type = Arg::new("type")
        .short('T')
        .long("type")
        .help("Asset type to minify")
        .value_parser(["css", "js", "style", "script"]);

    let arg_destination = Arg::new("destination")
        .short('d')
        .long("destination")
        .help("Write the versioned tree under this folder instead of the source");

    let arg_segment = Arg::new("segment")
        .long("segment")
        .help("Path segment the version is inserted after [default: depends on the type]");

    let arg_tool = Arg::new("tool")
        .long("tool")
        .help("Path of the minifier, e.g. the YUI compressor jar");

    let arg_tool_prefix = Arg::new("tool_prefix")
        .long("tool-prefix")
        .help("Command placed before the minifier path, \"java -jar\" by default, empty for none");

    let arg_charset = Arg::new("charset")
        .long("charset")
        .help("Character set handed to the minifier, empty to leave it out");

    let arg_mode = Arg::new("mode")
        .short('m')
        .long("mode")
        .help("Octal permission mode for created folders [default: 755]");

    let arg_show = Arg::new("show_activity")
        .short('a')
        .long("show-activity")
        .help("Print progress as it happens instead of in the final report")
        .action(ArgAction::SetTrue);

    let arg_parallel = Arg::new("parallel")
        .short('p')
        .long("parallel")
        .help("Minify files on all CPUs")
        .action(ArgAction::SetTrue);

    let arg_dump = Arg::new("dump_errors")
        .long("dump-errors")
        .help("Print the raw error records after each report")
        .action(ArgAction::SetTrue);

    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count);

    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .default_value(LOG_FILE_DEFAULT);

    let log_locally = Arg::new("log_locally")
        .short('L')
        .long("log-locally")
        .help(LOCAL_LOGGING_HELP)
        .action(ArgAction::SetTrue);

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .arg(arg_config)
        .arg(arg_source)
        .arg(arg_tag)
        .arg(arg_type)
        .arg(arg_destination)
        .arg(arg_segment)
        .arg(arg_tool)
        .arg(arg_tool_prefix)
        .arg(arg_charset)
        .arg(arg_mode)
        .arg(arg_show)
        .arg(arg_parallel)
        .arg(arg_dump)
        .arg(arg_verbose)
        .arg(log_file)
        .arg(log_locally)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Gets the verbosity level from the number of -v/--verbose flags
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    let verbose_count = matches.get_count("verbose");
    LogLevel::from_occurrences(verbose_count)
}

/// Gets the log file, `None` when file logging is off
///
/// Unless `--log-locally` is given the file lives in the platform config folder.
pub fn get_log_file(matches: &ArgMatches) -> Result<Option<PathBuf>> {
    let filename = matches
        .get_one::<String>("log_file")
        .cloned()
        .unwrap_or_else(|| LOG_FILE_DEFAULT.to_string());

    if filename.is_empty() {
        return Ok(None);
    }
    if matches.get_flag("log_locally") {
        Ok(Some(PathBuf::from(filename)))
    } else {
        let folder = find_project_folder()?;
        Ok(Some(folder.config_dir().join(filename)))
    }
}

/// Builds the single run described by the flags, `None` without `--source`
///
/// # Errors
/// Returns an error if a flag value is malformed or the resulting
/// configuration does not validate
pub fn config_from_matches(matches: &ArgMatches) -> Result<Option<Config>> {
    let Some(source) = matches.get_one::<String>("source") else {
        return Ok(None);
    };

    let tag = matches
        .get_one::<String>("tag")
        .ok_or_else(|| anyhow!("--tag is required together with --source"))?;
    let asset_type: AssetType = matches
        .get_one::<String>("type")
        .ok_or_else(|| anyhow!("--type is required together with --source"))?
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let mut builder = Config::builder(expand_path(source), tag, asset_type)
        .show_activity(matches.get_flag("show_activity"))
        .parallel(matches.get_flag("parallel"));

    if let Some(destination) = matches.get_one::<String>("destination") {
        builder = builder.destination(expand_path(destination));
    }
    if let Some(segment) = matches.get_one::<String>("segment") {
        builder = builder.versioned_segment(segment);
    }
    if let Some(tool) = matches.get_one::<String>("tool") {
        builder = builder.tool_executable(expand_path(tool));
    }
    if let Some(prefix) = matches.get_one::<String>("tool_prefix") {
        builder = builder.tool_prefix(prefix.split_whitespace());
    }
    if let Some(charset) = matches.get_one::<String>("charset") {
        builder = builder.charset(charset);
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        builder = builder.folder_mode(parse_octal_mode(mode).map_err(|e| anyhow!(e))?);
    }

    Ok(Some(builder.build()?))
}
