use std::process::Command;

use tempfile::TempDir;

use crate::helpers::CommandExt;
use crate::helpers::binary_path;

#[test]
fn test_no_cpp_files() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("notes.txt"), "struct S { Eigen::Matrix4f m; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Warning: No C++ files found under the given path(s).

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_unsafe_field_is_reported() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: aligned_operator_new
     --> test.cpp:1:8
      |
    1 | struct S { Eigen::Matrix4f m; };
      |        - `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`.
      |
      = help: Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.


    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_override_and_plain_fields_pass() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("override.cpp"),
        "struct S { Eigen::Matrix4f m; void* operator new(size_t); };",
    )?;
    std::fs::write(
        directory.join("macro.hpp"),
        "class Pose {\n public:\n  Eigen::Vector4d t;\n  EIGEN_MAKE_ALIGNED_OPERATOR_NEW\n};\n",
    )?;
    std::fs::write(directory.join("plain.cc"), "struct S { int x; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----

    ── Summary ──────────────────────────────────────
    All checks passed!

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_nested_records() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("test.cpp"),
        "struct Outer { struct Inner { Eigen::Matrix4f m; }; };",
    )?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.cpp [1:23] aligned_operator_new `Outer::Inner` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint.aligned-operator-new]
nested-records = "all"
"#,
    )?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.cpp [1:8] aligned_operator_new `Outer` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.
    test.cpp [1:23] aligned_operator_new `Outer::Inner` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 2 errors.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_unreadable_file_is_an_error() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("bad.cpp"), [0xff, 0xfe, 0x00, 0x80])?;
    std::fs::write(directory.join("good.cpp"), "struct S { Eigen::Matrix4f m; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 2
    ----- stdout -----
    good.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ── Warnings ─────────────────────────────────────
    1 file(s) could not be checked, see the errors above.

    ----- stderr -----
    Error: Failed to read file: bad.cpp: stream did not contain valid UTF-8
    "
    );

    Ok(())
}

#[test]
fn test_syntax_errors_do_not_stop_the_analysis() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("test.cpp"),
        "struct Broken { int = ; };\nstruct S { Eigen::Matrix4f m; };\n",
    )?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg("test.cpp")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.cpp [2:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_with_timing() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("test.cpp"), "struct S { int x; };")?;

    let output = Command::new(binary_path())
        .current_dir(directory)
        .arg("check")
        .arg(".")
        .arg("--with-timing")
        .run()
        .to_string();

    assert!(output.contains("── Notes ────────────────────────────────────────"));
    assert!(output.contains("Checked files in: "));

    Ok(())
}
