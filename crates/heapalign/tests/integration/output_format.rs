use std::process::Command;

use tempfile::TempDir;

use crate::helpers::CommandExt;
use crate::helpers::binary_path;

fn write_files(directory: &std::path::Path) -> anyhow::Result<()> {
    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;
    std::fs::write(
        directory.join("test2.hpp"),
        "namespace geo {\nclass Pose {\n  Eigen::Vector4d t;\n};\n}\n",
    )?;
    Ok(())
}

#[test]
fn test_output_default() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    write_files(directory)?;

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

    warning: aligned_operator_new
     --> test2.hpp:2:7
      |
    2 | class Pose {
      |       ---- `geo::Pose` has a field `t` of alignment-sensitive type `Eigen::Vector4d` but does not override `operator new`.
      |
      = help: Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.


    ── Summary ──────────────────────────────────────
    Found 2 errors.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_output_concise() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    write_files(directory)?;

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
    test.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.
    test2.hpp [2:7] aligned_operator_new `geo::Pose` has a field `t` of alignment-sensitive type `Eigen::Vector4d` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 2 errors.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_output_json() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("json")
            .run()
            .normalize_os_executable_name(),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    {
      "diagnostics": [
        {
          "message": {
            "name": "aligned_operator_new",
            "body": "`S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`.",
            "suggestion": "Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body."
          },
          "filename": "test.cpp",
          "range": [
            7,
            8
          ],
          "highlight": [
            0,
            31
          ],
          "location": {
            "row": 1,
            "column": 7
          }
        }
      ],
      "errors": []
    }

    ----- stderr -----
    "#
    );

    // Additional info such as timing isn't included in structured output
    let output = Command::new(binary_path())
        .current_dir(directory)
        .arg("check")
        .arg(".")
        .arg("--output-format")
        .arg("json")
        .arg("--with-timing")
        .run()
        .to_string();
    assert!(!output.contains("Checked files in"));
    assert!(!output.contains("Summary"));

    Ok(())
}

#[test]
fn test_output_json_with_errors() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("bad.cpp"), [0xff, 0xfe])?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("json")
            .run()
            .normalize_os_executable_name(),
        @r#"
    success: false
    exit_code: 2
    ----- stdout -----
    {
      "diagnostics": [],
      "errors": [
        {
          "file": "bad.cpp",
          "error": "Failed to read file: bad.cpp: stream did not contain valid UTF-8"
        }
      ]
    }

    ----- stderr -----
    "#
    );

    Ok(())
}

#[test]
fn test_no_color_flag() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();
    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;

    let output = Command::new(binary_path())
        .current_dir(directory)
        .arg("check")
        .arg(".")
        .arg("--no-color")
        .run()
        .to_string();
    assert!(!output.contains('\u{1b}'));

    Ok(())
}
