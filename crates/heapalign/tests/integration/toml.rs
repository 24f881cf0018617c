use std::process::Command;

use tempfile::TempDir;

use crate::helpers::CommandExt;
use crate::helpers::binary_path;

#[test]
fn test_toml_select_and_cli_override() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint]
select = []
"#,
    )?;
    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;

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

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .arg("--extend-select")
            .arg("PERF")
            .arg("--output-format")
            .arg("concise")
            .run()
            .normalize_os_executable_name(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    test.cpp [1:8] aligned_operator_new `S` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 1 error.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_custom_types_and_overrides() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint.aligned-operator-new]
extend-types = ["Vec4"]
extend-allocation-overrides = ["MY_ALIGNED_NEW"]
"#,
    )?;
    std::fs::write(
        directory.join("test.cpp"),
        "struct A { Vec4 v; };\nstruct B {\n  Vec4 v;\n  MY_ALIGNED_NEW\n};\nstruct C { Eigen::Matrix4f m; };\n",
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
    test.cpp [1:8] aligned_operator_new `A` has a field `v` of alignment-sensitive type `Vec4` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.
    test.cpp [6:8] aligned_operator_new `C` has a field `m` of alignment-sensitive type `Eigen::Matrix4f` but does not override `operator new`. Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.

    ── Summary ──────────────────────────────────────
    Found 2 errors.

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_both_field_and_extend_is_error() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint.aligned-operator-new]
types = ["Eigen::Matrix4f"]
extend-types = ["Vec4"]
"#,
    )?;
    std::fs::write(directory.join("test.cpp"), "struct S { Eigen::Matrix4f m; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory)
            .arg("check")
            .arg(".")
            .run()
            .normalize_os_executable_name()
            .normalize_temp_paths(),
        @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    heapalign failed
      Cause: Invalid configuration in [TEMP_DIR]/heapalign.toml
      Cause: Cannot specify both `types` and `extend-types` in `[lint.aligned-operator-new]`.
    "
    );

    Ok(())
}

#[test]
fn test_unknown_field_is_error() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(
        directory.join("heapalign.toml"),
        r#"
[lint]
unknown-option = true
"#,
    )?;
    std::fs::write(directory.join("test.cpp"), "struct S { int x; };")?;

    let output = Command::new(binary_path())
        .current_dir(directory)
        .arg("check")
        .arg(".")
        .run()
        .normalize_temp_paths()
        .to_string();

    assert!(output.contains("exit_code: 2"));
    assert!(output.contains("Cause: Failed to parse [TEMP_DIR]/heapalign.toml:"));
    assert!(output.contains("unknown-option"));

    Ok(())
}

#[test]
fn test_nearest_config_applies() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("heapalign.toml"), "[lint]\n")?;
    std::fs::create_dir_all(directory.join("legacy"))?;
    std::fs::write(
        directory.join("legacy/heapalign.toml"),
        r#"
[lint]
ignore = ["aligned_operator_new"]
"#,
    )?;
    std::fs::write(directory.join("main.cpp"), "struct S { Eigen::Matrix4f m; };")?;
    std::fs::write(directory.join("legacy/old.cpp"), "struct T { Eigen::Matrix4f m; };")?;

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
fn test_parent_config_is_noted() -> anyhow::Result<()> {
    let directory = TempDir::new()?;
    let directory = directory.path();

    std::fs::write(directory.join("heapalign.toml"), "[lint]\nselect = [\"PERF\"]\n")?;
    std::fs::create_dir_all(directory.join("src"))?;
    std::fs::write(directory.join("src/test.cpp"), "struct S { int x; };")?;

    insta::assert_snapshot!(
        &mut Command::new(binary_path())
            .current_dir(directory.join("src"))
            .arg("check")
            .arg(".")
            .run()
            .normalize_os_executable_name()
            .normalize_temp_paths(),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----

    ── Summary ──────────────────────────────────────
    All checks passed!

    ── Notes ────────────────────────────────────────
    Used '[TEMP_DIR]/heapalign.toml'

    ----- stderr -----
    "
    );

    Ok(())
}
