use crate::logging::LogLevel;
use crate::output_format::OutputFormat;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

// Configures Clap v3-style help menu colors
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser)]
#[command(
    author,
    name = "heapalign",
    about = "heapalign: find C++ classes that are heap-allocated without the alignment their Eigen members need",
    after_help = "For help with a specific command, see: `heapalign help <command>`."
)]
#[command(version)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub(crate) command: Command,
    #[clap(flatten)]
    pub(crate) global_options: GlobalOptions,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Check a set of files or directories
    Check(CheckCommand),

    /// Show the available rules, or the documentation of one rule
    Rule(RuleCommand),
}

#[derive(Clone, Debug, Parser)]
#[command(arg_required_else_help(true))]
pub struct CheckCommand {
    #[arg(
        required = true,
        help = "List of files or directories to check, for example `heapalign check src`."
    )]
    pub files: Vec<String>,
    #[arg(
        short,
        long,
        default_value = "",
        help = "Comma-separated rules to run instead of the configured ones. Categories such as \"PERF\" select all of their rules."
    )]
    pub select: String,
    #[arg(
        short,
        long,
        default_value = "",
        help = "Comma-separated rules or categories to run on top of the selected ones."
    )]
    pub extend_select: String,
    #[arg(
        short,
        long,
        default_value = "",
        help = "Comma-separated rules or categories to skip. Takes precedence over `--select` and `--extend-select`."
    )]
    pub ignore: String,
    #[arg(
        short,
        long,
        default_value = "false",
        help = "Report how long the analysis took."
    )]
    pub with_timing: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::default(),
        help = "How to print the diagnostics."
    )]
    pub output_format: OutputFormat,
    #[arg(
        long,
        default_value = "false",
        help = "Also walk `build/`, `third_party/`, `external/`, `vendor/` and `.git/`."
    )]
    pub no_default_exclude: bool,
    #[arg(
        long,
        default_value = "false",
        help = "Do not read the headers pulled in with `#include \"...\"`."
    )]
    pub no_follow_includes: bool,
    #[arg(
        long,
        default_value = "false",
        help = "Only print how many diagnostics each rule produced."
    )]
    pub statistics: bool,
}

#[derive(Clone, Debug, Parser)]
pub struct RuleCommand {
    #[arg(help = "Name of the rule to document. All rules are listed when omitted.")]
    pub name: Option<String>,
}

/// All configuration options that can be passed "globally"
#[derive(Debug, Default, clap::Args)]
#[command(next_help_heading = "Global options")]
pub(crate) struct GlobalOptions {
    /// The log level. One of: `error`, `warn`, `info`, `debug`, or `trace`. Defaults
    /// to `warn`.
    #[arg(long, global = true)]
    pub(crate) log_level: Option<LogLevel>,

    /// Disable colored output. The `NO_COLOR` environment variable has the
    /// same effect.
    #[arg(long, global = true)]
    pub(crate) no_color: bool,
}
