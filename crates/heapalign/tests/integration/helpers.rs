use std::fmt::{self, Display};
use std::path::PathBuf;
use std::process::Command;

use regex::Regex;

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_heapalign"))
}

/// Output of one run of the binary, laid out for snapshots.
pub struct CommandOutput(String);

impl CommandOutput {
    pub fn normalize_os_executable_name(self) -> Self {
        Self(self.0.replace("heapalign.exe", "heapalign"))
    }

    /// Replace the absolute path of the temporary directories created by the
    /// tests with `[TEMP_DIR]`.
    pub fn normalize_temp_paths(self) -> Self {
        let mut roots = vec![std::env::temp_dir()];
        if let Ok(canonical) = std::env::temp_dir().canonicalize() {
            roots.push(canonical);
        }

        let mut output = self.0;
        for root in roots {
            let root = root.to_string_lossy();
            let root = root.trim_end_matches(['/', '\\']);
            let pattern = format!(r"{}[/\\]\.tmp[A-Za-z0-9]+", regex::escape(root));
            let re = Regex::new(&pattern).unwrap();
            output = re.replace_all(&output, "[TEMP_DIR]").into_owned();
        }
        Self(output.replace('\\', "/"))
    }
}

impl Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait CommandExt {
    fn run(&mut self) -> CommandOutput;
}

impl CommandExt for Command {
    fn run(&mut self) -> CommandOutput {
        let output = self
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            // Keep the user configuration of the machine running the tests
            // out of the way.
            .env("XDG_CONFIG_HOME", std::env::temp_dir().join("heapalign-tests-no-config"))
            .output()
            .expect("Failed to run the heapalign binary");

        CommandOutput(format!(
            "success: {}\nexit_code: {}\n----- stdout -----\n{}\n----- stderr -----\n{}",
            output.status.success(),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}
