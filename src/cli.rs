use crate::palette::Preset;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Rewrites legacy brand colors across a source tree.
///
/// `recolor` walks a directory, picks out style and script files, and
/// replaces a fixed, ordered set of hex color codes with their new values.
/// Files are only touched when their content actually changes.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Rewrite hex color codes across a source tree",
    long_about = "recolor - Literal color-code substitution for style and script files.

With no arguments it rewrites the current directory using the built-in
brand palette, skipping node_modules, .next and .git.

QUICK EXAMPLES:
  recolor                          # Rewrite the current directory
  recolor web/ --dry-run           # Preview changes under web/
  recolor --backup                 # Keep <file>.bak copies of the originals
  recolor --undo                   # Restore every <file>.bak
  recolor --preset revert          # Inverse mapping (also hits colors that were already new)
  recolor -c recolor.yaml --strict # Custom table, fail loudly on write errors

Config file format (recolor.yaml):
  replacements:
    - from: '#1243B2'
      to: '#10367D'
  extensions: [css, scss]
  exclude: [node_modules, dist]"
)]
pub struct Args {
    /// The directory to rewrite. Defaults to the current working directory.
    pub root: Option<PathBuf>,

    /// Path to a YAML configuration file with replacement rules.
    #[arg(short, long, env = "RECOLOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// The built-in replacement table to use when the config has none.
    #[arg(long, value_enum, default_value_t = Preset::Brand)]
    pub preset: Preset,

    /// A comma-separated list of file suffixes to include (e.g. `css,ts`).
    #[arg(short = 'x', long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// A comma-separated list of directory names to exclude.
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Preview the changes without modifying any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Copy each file to `<file>.bak` before overwriting it.
    #[arg(long)]
    pub backup: bool,

    /// Restore files from their `.bak` copies instead of rewriting.
    #[arg(long, conflicts_with_all = ["dry_run", "backup"])]
    pub undo: bool,

    /// With `--undo`, leave the `.bak` files in place after restoring.
    #[arg(long, requires = "undo")]
    pub keep_backups: bool,

    /// Report skipped files on stderr and exit with status 2 if any change was lost.
    #[arg(long)]
    pub strict: bool,

    /// Exit with an error when the root directory does not exist.
    #[arg(long)]
    pub fail_on_missing_root: bool,

    /// Print a summary of the run after the per-file lines.
    #[arg(long)]
    pub summary: bool,

    /// The output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug diagnostics on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_valid() {
        let args = Args::try_parse_from(["recolor"]).unwrap();
        assert!(args.root.is_none());
        assert_eq!(args.preset, Preset::Brand);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.strict);
    }

    #[test]
    fn test_comma_separated_lists() {
        let args = Args::try_parse_from([
            "recolor",
            "web",
            "-x",
            "css,scss",
            "-e",
            "dist,node_modules",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("web")));
        assert_eq!(args.extensions, vec!["css", "scss"]);
        assert_eq!(args.exclude, vec!["dist", "node_modules"]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_keep_backups_requires_undo() {
        assert!(Args::try_parse_from(["recolor", "--keep-backups"]).is_err());
        assert!(Args::try_parse_from(["recolor", "--undo", "--keep-backups"]).is_ok());
        assert!(Args::try_parse_from(["recolor", "--undo", "--dry-run"]).is_err());
    }
}
