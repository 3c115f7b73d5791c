use crate::errors::Result;
use crate::palette::{Preset, Replacement, ReplacementTable};
use crate::walker::RootPolicy;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Directory names pruned from the walk by default.
pub const DEFAULT_EXCLUDE: [&str; 3] = ["node_modules", ".next", ".git"];

/// File name suffixes rewritten by default.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".ts", ".tsx", ".css", ".js", ".mjs"];

/// On-disk configuration for a rewrite run.
///
/// Example (`recolor.yaml`):
///
/// ```yaml
/// replacements:
///   - from: "#1243B2"
///     to: "#10367D"
/// extensions: [css, scss]
/// exclude: [node_modules, dist]
/// ```
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RewriteConfig {
    /// Ordered replacement pairs. Empty means "use the preset".
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    /// An optional list of file extensions to include in the operation.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// An optional list of directory names to exclude from the operation.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// Behavioural switches for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// Compute changes without writing anything.
    pub dry_run: bool,
    /// Copy each file to `<path>.bak` before overwriting it.
    pub backup: bool,
    /// Treat unreadable files as failures too, not just unwritable ones.
    pub strict: bool,
    /// What to do when the root is missing.
    pub root_policy: RootPolicy,
}

/// The resolved, immutable settings a [`Rewriter`](crate::rewriter::Rewriter) runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub table: ReplacementTable,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub options: RewriteOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: Preset::Brand.table(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            options: RewriteOptions::default(),
        }
    }
}

impl Settings {
    /// Resolves settings with precedence: CLI values, then the config file, then the preset.
    pub fn resolve(
        preset: Preset,
        config: Option<RewriteConfig>,
        extensions: Vec<String>,
        exclude: Vec<String>,
        options: RewriteOptions,
    ) -> Result<Self> {
        let config = config.unwrap_or_default();

        let table = if config.replacements.is_empty() {
            preset.table()
        } else {
            ReplacementTable::new(config.replacements)?
        };

        let extensions = if !extensions.is_empty() {
            extensions
        } else {
            config
                .extensions
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
        };

        let exclude = if !exclude.is_empty() {
            exclude
        } else {
            config
                .exclude
                .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect())
        };

        Ok(Self {
            table,
            extensions: normalize_extensions(&extensions),
            exclude: exclude
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            options,
        })
    }
}

/// Trims each extension and guarantees a leading dot. Case is kept as-is.
pub fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('.') {
                s.to_string()
            } else {
                format!(".{s}")
            }
        })
        .collect()
}

/// A utility for locating and loading rewrite configurations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file by searching in a prioritized list of locations.
    ///
    /// The search order is:
    /// 1. The path as given (absolute, or relative to the current directory).
    /// 2. A path relative to the `working_dir`.
    /// 3. Inside the user config directory (`<config_dir>/recolor`).
    /// 4. Next to the executable.
    pub fn find_config(config_path: &Path, working_dir: &Path) -> Result<PathBuf> {
        if config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        let mut tried_locations = vec![config_path.to_path_buf()];

        let in_working_dir = working_dir.join(config_path);
        if in_working_dir.exists() {
            return Ok(in_working_dir);
        }
        tried_locations.push(in_working_dir);

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("recolor").join(config_path);
            if user_config.exists() {
                return Ok(user_config);
            }
            tried_locations.push(user_config);
        }

        if let Ok(exe_path) = env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let exe_config = exe_dir.join(config_path);
                if exe_config.exists() {
                    return Ok(exe_config);
                }
                tried_locations.push(exe_config);
            }
        }

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}",
            config_path.display(),
            tried_locations
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n  - ")
        )
        .into())
    }

    /// Loads a `RewriteConfig` from a YAML file.
    pub fn load(path: &Path) -> Result<RewriteConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}
