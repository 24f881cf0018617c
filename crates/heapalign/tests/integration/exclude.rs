use std::process::Command;

use tempfile::TempDir;

use crate::helpers::CommandExt;
use crate::helpers::binary_path;

const UNSAFE: &str = "struct S { Eigen::Matrix4f m; };";

#[test]
fn test_default_exclude() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::create_dir_all(directory.join("build"))?;
    std::fs::create_dir_all(directory.join("third_party/eigen"))?;
    std::fs::write(directory.join("build/generated.cpp"), UNSAFE)?;
    std::fs::write(directory.join("third_party/eigen/Core.h"), UNSAFE)?;

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

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--no-default-exclude")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name()
            .normalize_temp_paths(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    build/generated.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.
    third_party/eigen/Core.h [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 2 errors.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_default_exclude_can_be_disabled_in_toml() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("heapalign.toml"), "[lint]\ndefault-exclude = false\n")?;
    std::fs::create_dir_all(directory.join("vendor"))?;
    std::fs::write(directory.join("vendor/lib.cpp"), UNSAFE)?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name()
            .normalize_temp_paths(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    vendor/lib.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_exclude_patterns() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint]
exclude = ["generated/", "*.inl"]
"#,
    )?;
    std::fs::create_dir_all(directory.join("generated"))?;
    std::fs::write(directory.join("generated/proto.cpp"), UNSAFE)?;
    std::fs::write(directory.join("impl.inl"), UNSAFE)?;
    std::fs::write(directory.join("main.cpp"), UNSAFE)?;

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
    main.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_explicit_file_is_always_checked() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::create_dir_all(directory.join("build"))?;
    std::fs::write(directory.join("build/generated.cpp"), UNSAFE)?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg("build/generated.cpp")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    build/generated.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}
