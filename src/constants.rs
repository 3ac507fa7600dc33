/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Qualifier string used for application identification
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// This is the name used for the platform configuration directory.
pub const APPLICATION: &str = "versioned_minify";

/// Default location of the YUI compressor on Debian based systems
pub const DEFAULT_TOOL_EXECUTABLE: &str = "/usr/share/yui-compressor/yui-compressor.jar";

/// Default command placed in front of the tool executable
pub const DEFAULT_TOOL_PREFIX: [&str; 2] = ["java", "-jar"];

/// Default character set handed to the tool
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Default permission bits for created directories
pub const DEFAULT_FOLDER_MODE: u32 = 0o755;

/// Segment versioned for style sheet runs
pub const STYLE_SEGMENT: &str = "/public/css/";

/// Segment versioned for script runs
pub const SCRIPT_SEGMENT: &str = "/public/js/custom/";

/// Extensions copied to the versioned tree without minification
pub const DEFAULT_PASS_THROUGH: [&str; 1] = ["json"];

/// Version control folders never copied to the versioned tree
pub const DEFAULT_EXCLUDED: [&str; 2] = [".svn", ".git"];

/// Operation keys used in the error report
pub const OP_CREATE_DIRECTORIES: &str = "create_directories";
pub const OP_MINIFY: &str = "minify";
pub const OP_COPY: &str = "copy";
pub const OP_VERSION_PATHS: &str = "version_paths";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read jobs from a specific config file";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Write the log to this file as well";

/// Help text for the local logging command-line option
pub const LOCAL_LOGGING_HELP: &str =
    "Keep the log file in the working directory instead of the config folder";

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "vminify.yaml";

/// Default log file name, empty disables file logging
pub const LOG_FILE_DEFAULT: &str = "";
