use clap::Parser;
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.assertup.toml or pyproject.toml [tool.assertup]):
  Create this file in your project root to set defaults.

  [assertup]
  pattern = \"test_*.py\"      # Wildcard for test files inside directories
  skip = [\"assertTrue\"]      # Assertion names to leave untouched
  max_passes = 5             # Rewrite passes per file before giving up

  Command-line flags take precedence; skip lists are merged.
";

/// Command-line arguments for the assertion rewriter.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "assertup",
    version,
    about = "Rewrites unittest assertions into their most specific form.",
    after_help = CONFIG_HELP
)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct Cli {
    /// Files or directories to refactor.
    /// Directories are searched recursively for files matching --pattern;
    /// explicit file paths are always refactored.
    pub paths: Vec<PathBuf>,

    /// Wildcard pattern for capturing test files (default: test_*.py).
    #[arg(long)]
    pub pattern: Option<String>,

    /// Assertion name to leave untouched (repeatable).
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,

    /// Print out some debug stats about the refactorings.
    #[arg(long)]
    pub show_stats: bool,

    /// Print the stats as raw JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Exit with status code 1 if any file changed.
    #[arg(long)]
    pub fail_on_change: bool,

    /// Maximum rewrite passes per file (default: 5).
    #[arg(long, value_name = "N")]
    pub max_passes: Option<usize>,
}
