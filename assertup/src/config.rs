use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the standalone configuration file.
pub const CONFIG_FILENAME: &str = ".assertup.toml";
/// Name of the Python project file that may carry a `[tool.assertup]` table.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for assertup.
    pub assertup: AssertupConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for assertup.
pub struct AssertupConfig {
    /// Wildcard pattern for capturing test files inside directories.
    pub pattern: Option<String>,
    /// Assertion names to leave untouched.
    pub skip: Option<Vec<String>>,
    /// Maximum rewrite passes per file.
    pub max_passes: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    assertup: AssertupConfig,
}

impl Config {
    /// Loads configuration from default locations (.assertup.toml or
    /// pyproject.toml in the current directory or above).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let assertup_toml = current.join(CONFIG_FILENAME);
            if assertup_toml.exists() {
                if let Ok(content) = fs::read_to_string(&assertup_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(assertup_toml);
                        return config;
                    }
                }
            }

            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyproject_toml) {
                    if let Ok(pyproject) = toml::from_str::<PyProject>(&content) {
                        return Config {
                            assertup: pyproject.tool.assertup,
                            config_file_path: Some(pyproject_toml),
                        };
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
