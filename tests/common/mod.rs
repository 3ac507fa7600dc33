#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use versioned_minify::prelude::{AssetType, ConfigBuilder};

/// Stand-in for the YUI compressor, run as `sh <script> <in> -o <out> [--charset <cs>]`
///
/// It strips spaces and newlines from the input and fails loudly for any
/// input whose name contains `broken`.
pub const FAKE_MINIFIER: &str = r#"in="$1"
out="$3"
case "$in" in
  *broken*) echo "[ERROR] 1:1:syntax error" >&2; exit 2 ;;
esac
tr -d ' \n' < "$in" > "$out"
"#;

/// Minifier that succeeds but always has something to say
pub const CHATTY_MINIFIER: &str = r#"echo "[WARNING] Found an undeclared symbol"
cp "$1" "$3"
"#;

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    let mut file = File::create(path).expect("Failed to create test file");
    write!(file, "{content}").expect("Failed to write to test file");
}

/// Writes a minifier script next to the trees under test
pub fn write_minifier(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("minifier.sh");
    write_file(&path, script);
    path
}

/// Builder wired to a minifier script through `sh`
pub fn builder_with_script(
    source: &Path,
    version: &str,
    asset_type: AssetType,
    script: &Path,
) -> ConfigBuilder {
    ConfigBuilder::new(source, version, asset_type)
        .tool_prefix(["sh"])
        .tool_executable(script)
}
