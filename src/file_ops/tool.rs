//! External minifier invocation
//!
//! The minifier is a black box called as
//! `<prefix...> <executable> <input> -o <output> [--charset <charset>]`.
//! Both output streams are captured, each call waits for the process to exit.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::config::ToolConfig;
use crate::errors::{Result, generic_error, tool_invocation_error};

/// What came back from one minifier run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRun {
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, absent when the process was killed by a signal
    pub code: Option<i32>,
    /// Standard output followed by standard error, lines joined by spaces
    pub output: String,
}

impl ToolRun {
    /// Describes the run for the error log, `None` when there is nothing to report
    pub fn problem(&self) -> Option<String> {
        match (self.success, self.output.is_empty()) {
            (true, true) => None,
            (true, false) => Some(self.output.clone()),
            (false, true) => Some(self.exit_description()),
            (false, false) => Some(format!("{} {}", self.exit_description(), self.output)),
        }
    }

    fn exit_description(&self) -> String {
        match self.code {
            Some(code) => format!("Minifier exited with status {code}:"),
            None => "Minifier was terminated by a signal:".to_string(),
        }
    }
}

/// Builds the argument list, the first element is the program
pub fn command_line(
    tool: &ToolConfig,
    input: &Path,
    output: &Path,
    charset_option: &[String],
) -> Vec<OsString> {
    let mut line: Vec<OsString> = tool.prefix.iter().map(OsString::from).collect();
    line.push(tool.executable.clone().into_os_string());
    line.push(input.as_os_str().to_owned());
    line.push(OsString::from("-o"));
    line.push(output.as_os_str().to_owned());
    line.extend(charset_option.iter().map(OsString::from));
    line
}

/// Runs the minifier for one file and waits for it
///
/// # Errors
/// Returns an error if the process cannot be started
pub fn run_tool(
    tool: &ToolConfig,
    input: &Path,
    output: &Path,
    charset_option: &[String],
) -> Result<ToolRun> {
    let line = command_line(tool, input, output, charset_option);
    let printable = line
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");

    let (program, args) = line
        .split_first()
        .ok_or_else(|| generic_error("Minifier command line is empty"))?;

    debug!("Running: {printable}");

    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| tool_invocation_error(e, &printable))?;

    let mut lines: Vec<String> = Vec::new();
    for stream in [&result.stdout, &result.stderr] {
        lines.extend(
            String::from_utf8_lossy(stream)
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(ToolRun {
        success: result.status.success(),
        code: result.status.code(),
        output: lines.join(" "),
    })
}
