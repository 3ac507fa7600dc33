#![cfg(unix)]

mod common;

use std::fs;

use tempfile::tempdir;

use common::{FAKE_MINIFIER, builder_with_script, write_file, write_minifier};
use versioned_minify::constants::{OP_MINIFY, OP_VERSION_PATHS};
use versioned_minify::prelude::*;

#[test]
fn test_end_to_end_css_run() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("src/assets");
    let destination = temp_dir.path().join("dest/assets");

    write_file(&source.join("a.css"), "a { color: blue; }");
    write_file(&source.join("b.json"), "{\"sprites\": [1, 2]}");
    write_file(&source.join("README.md"), "# assets");
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "v1", AssetType::Style, &script)
        .destination(&destination)
        .versioned_segment("/assets/")
        .build()
        .expect("Configuration should be valid");

    let report = Pipeline::new(config).run().expect("Run should not fail");

    let version_root = destination.join("v1");
    assert_eq!(report.version_root, version_root);
    assert_eq!(
        fs::read_to_string(version_root.join("a.css")).unwrap(),
        "a{color:blue;}"
    );
    assert_eq!(
        fs::read(version_root.join("b.json")).unwrap(),
        fs::read(source.join("b.json")).unwrap()
    );
    assert!(!version_root.join("README.md").exists());

    assert_eq!(report.status, RunStatus::Succeeded);
    assert_eq!(report.stats.files_minified, 1);
    assert_eq!(report.stats.files_copied, 1);
    assert_eq!(report.stats.files_ignored, 1);

    let text = report.to_string();
    assert!(text.contains("Have minified a total of: 1 css files."), "{text}");
    assert!(text.ends_with("** No errors were logged **"), "{text}");
}

#[test]
fn test_tool_failure_for_one_file_is_reported_once() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("www/public/css");

    write_file(&source.join("layout.css"), "div { float: left; }");
    write_file(&source.join("theme/broken.css"), "div { float: ");
    write_file(&source.join("theme/colors.css"), "p { color: red; }");
    write_file(&source.join("theme/icons.json"), "[]");
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "1112v4", AssetType::Style, &script)
        .build()
        .unwrap();

    let report = Pipeline::new(config).run().expect("Run should not fail");

    let version_root = source.join("1112v4");
    assert!(version_root.join("layout.css").exists());
    assert!(version_root.join("theme/colors.css").exists());
    assert!(version_root.join("theme/icons.json").exists());
    assert!(!version_root.join("theme/broken.css").exists());

    let failed_destination = version_root.join("theme/broken.css");
    let errors = report.log.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].operation.as_deref(), Some(OP_MINIFY));
    assert!(
        errors[0]
            .message
            .ends_with(&format!("- For file: {}", failed_destination.display())),
        "{}",
        errors[0].message
    );
    assert!(errors[0].message.contains("syntax error"));

    assert_eq!(report.status, RunStatus::SucceededWithWarnings(1));
    assert_eq!(report.stats.files_minified, 3);
    assert_eq!(report.stats.files_failed, 1);
    assert!(
        report
            .to_string()
            .contains("Have minified a total of: 3 css files.")
    );
}

#[test]
fn test_rerun_is_independent_and_skips_its_own_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("site/public/js/custom");

    write_file(&source.join("app.js"), "var a = 1;");
    write_file(&source.join("lib/util.js"), "var b = 2;");
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "r2", AssetType::Script, &script)
        .build()
        .unwrap();
    let pipeline = Pipeline::new(config);

    let first = pipeline.run().expect("First run should not fail");
    let second = pipeline.run().expect("Second run should not fail");

    assert_eq!(first.stats.files_minified, 2);
    assert_eq!(second.stats.files_minified, 2);
    assert_eq!(second.stats.directories_created, 0);
    assert!(second.is_clean(), "{second}");
    assert!(!source.join("r2/r2").exists());
    assert_eq!(first.files, second.files);
}

#[test]
fn test_file_lists_stay_aligned() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("public/css");

    write_file(&source.join("a.css"), "a{}");
    write_file(&source.join("x/b.css"), "b{}");
    write_file(&source.join("x/y/c.json"), "{}");
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "v5", AssetType::Style, &script)
        .build()
        .unwrap();
    let report = Pipeline::new(config).run().unwrap();

    let originals: Vec<_> = report.original_files().collect();
    let versioned: Vec<_> = report.versioned_files().collect();
    assert_eq!(originals.len(), versioned.len());
    for (original, versioned) in originals.iter().zip(versioned.iter()) {
        let relative = original.strip_prefix(&source).unwrap();
        assert_eq!(*versioned, source.join("v5").join(relative));
    }
}

#[test]
fn test_excluded_folders_are_not_copied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("public/css");

    write_file(&source.join("a.css"), "a{}");
    write_file(&source.join(".svn/entries"), "10");
    write_file(&source.join(".svn/props/a.json"), "{}");
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "v1", AssetType::Style, &script)
        .build()
        .unwrap();
    let report = Pipeline::new(config).run().unwrap();

    assert!(!source.join("v1/.svn").exists());
    assert_eq!(report.stats.files_copied, 0);
    assert!(report.directories.is_empty());
}

#[test]
fn test_missing_source_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("public/css");

    let config = Config::builder(&source, "v1", AssetType::Style)
        .build()
        .unwrap();
    let result = Pipeline::new(config).run();

    assert!(matches!(result, Err(Error::DirectoryNotFound { .. })));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_unicode_name_does_not_stop_the_run() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("www/public/css");

    write_file(&source.join("a.css"), "a { b: c; }");
    write_file(&source.join("sub/b.css"), "b { c: d; }");
    fs::write(source.join(OsStr::from_bytes(b"caf\xE9.txt")), "menu").unwrap();
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "v1", AssetType::Style, &script)
        .build()
        .unwrap();
    let report = Pipeline::new(config)
        .run()
        .expect("One odd file name should not fail the run");

    assert!(source.join("v1/a.css").exists());
    assert!(source.join("v1/sub/b.css").exists());
    assert_eq!(report.stats.files_minified, 2);
    assert_eq!(report.status, RunStatus::SucceededWithWarnings(1));
    assert_eq!(
        report.log.errors()[0].operation.as_deref(),
        Some(OP_VERSION_PATHS)
    );
}

#[test]
fn test_symbolic_link_is_reported_once() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let source = temp_dir.path().join("public/css");

    write_file(&source.join("a.css"), "a{}");
    std::os::unix::fs::symlink(source.join("a.css"), source.join("alias.css")).unwrap();
    let script = write_minifier(temp_dir.path(), FAKE_MINIFIER);

    let config = builder_with_script(&source, "v1", AssetType::Style, &script)
        .build()
        .unwrap();
    let report = Pipeline::new(config).run().unwrap();

    assert!(!source.join("v1/alias.css").exists());
    assert_eq!(report.stats.files_minified, 1);
    assert_eq!(
        report
            .log
            .output_activity()
            .matches("Skipping symbolic link:")
            .count(),
        1
    );
}
