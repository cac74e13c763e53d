//! CLI command execution: file discovery, per-file refactoring, reporting.
//!
//! Everything in this module is the thin wrapper around the engine: the core
//! rewrite logic lives in [`crate::refactor`] and stays single-threaded per
//! file, while this layer fans out over files with rayon and prints results
//! sequentially so output order is deterministic.

use crate::cli::Cli;
use crate::config::Config;
use crate::refactor::{rewrite_to_fixpoint, Blacklist, RewriteRecord, DEFAULT_MAX_PASSES};
use crate::utils::{matches_file_pattern, normalize_display_path};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use comfy_table::Table;
use compact_str::CompactString;
use ignore::WalkBuilder;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default wildcard for selecting test files inside directories.
const DEFAULT_PATTERN: &str = "test_*.py";

/// Effective options after merging CLI flags with file configuration.
/// CLI values win; skip lists are merged.
#[derive(Debug)]
struct Options {
    pattern: String,
    blacklist: Blacklist,
    max_passes: usize,
}

fn resolve_options(cli: &Cli, config: &Config) -> Options {
    let pattern = cli
        .pattern
        .clone()
        .or_else(|| config.assertup.pattern.clone())
        .unwrap_or_else(|| DEFAULT_PATTERN.to_owned());

    let mut blacklist: Blacklist = cli.skip.iter().cloned().collect();
    if let Some(skip) = &config.assertup.skip {
        blacklist.extend(skip.iter().cloned());
    }

    let max_passes = cli
        .max_passes
        .or(config.assertup.max_passes)
        .unwrap_or(DEFAULT_MAX_PASSES);

    Options {
        pattern,
        blacklist,
        max_passes,
    }
}

/// Outcome of refactoring one file.
struct FileOutcome {
    path: PathBuf,
    records: Vec<RewriteRecord>,
    changed: bool,
    error: Option<String>,
}

/// Parses `args` (without the program name) and runs the tool.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let cli = Cli::parse_from(std::iter::once(String::from("assertup")).chain(args));
    run(&cli, &mut std::io::stdout())
}

/// Runs the tool with already-parsed arguments, writing output to `writer`.
///
/// Returns the process exit code: 1 when `--fail-on-change` is set and at
/// least one file changed, 0 otherwise.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run<W: Write>(cli: &Cli, writer: &mut W) -> Result<i32> {
    let config_anchor = cli
        .paths
        .first()
        .map_or_else(|| PathBuf::from("."), Clone::clone);
    let config = Config::load_from_path(&config_anchor);
    let options = resolve_options(cli, &config);

    let files = discover_files(&cli.paths, &options.pattern);
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| refactor_file(path, &options))
        .collect();

    let mut modified_files = 0usize;
    let mut total_records: Vec<RewriteRecord> = Vec::new();
    for outcome in &outcomes {
        if let Some(error) = &outcome.error {
            writeln!(
                writer,
                "{} {}: {}",
                "error:".red(),
                normalize_display_path(&outcome.path),
                error
            )?;
        } else if outcome.changed {
            modified_files += 1;
            total_records.extend(outcome.records.iter().cloned());
            writeln!(
                writer,
                "{} {}",
                "reformatted".green(),
                normalize_display_path(&outcome.path)
            )?;
        }
    }

    if files.is_empty() {
        writeln!(writer, "Nothing to refactor!")?;
    } else {
        let left = files.len() - modified_files;
        let mut message = String::from("All done!");
        if modified_files > 0 {
            message.push_str(&format!(" {modified_files} reformatted"));
        }
        if left > 0 {
            if modified_files > 0 {
                message.push(',');
            }
            message.push_str(&format!(" {left} left unchanged"));
        }
        writeln!(writer, "{message}")?;
    }

    if cli.show_stats {
        print_stats(writer, modified_files, &total_records, cli.json)?;
    }

    if cli.fail_on_change && modified_files > 0 {
        return Ok(1);
    }
    Ok(0)
}

/// Collects the files to refactor: directories are walked recursively
/// (gitignore-aware) for names matching `pattern`; explicit file paths are
/// taken as-is.
fn discover_files(paths: &[PathBuf], pattern: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let walker = WalkBuilder::new(path)
                .hidden(false)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .build();
            for entry in walker.flatten() {
                if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
                    continue;
                }
                let matches = entry
                    .path()
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| matches_file_pattern(name, pattern));
                if matches {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        }
    }
    files.sort();
    files
}

/// Refactors one file in place, reporting rather than propagating read,
/// parse, and write failures so the batch keeps going.
fn refactor_file(path: &Path, options: &Options) -> FileOutcome {
    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        records: Vec::new(),
        changed: false,
        error: None,
    };

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            outcome.error = Some(error.to_string());
            return outcome;
        }
    };

    match rewrite_to_fixpoint(&source, &options.blacklist, options.max_passes) {
        Ok((rewritten, records)) => {
            if rewritten != source {
                if let Err(error) = fs::write(path, &rewritten) {
                    outcome.error = Some(error.to_string());
                    return outcome;
                }
                outcome.changed = true;
            }
            outcome.records = records;
        }
        Err(error) => outcome.error = Some(error.to_string()),
    }
    outcome
}

#[derive(Serialize)]
struct StatsEntry {
    original: CompactString,
    replacement: CompactString,
    count: usize,
}

#[derive(Serialize)]
struct StatsReport {
    total_refactors: usize,
    modified_files: usize,
    counts: Vec<StatsEntry>,
}

fn print_stats<W: Write>(
    writer: &mut W,
    modified_files: usize,
    records: &[RewriteRecord],
    json: bool,
) -> Result<()> {
    let mut counts: FxHashMap<(CompactString, CompactString), usize> = FxHashMap::default();
    for record in records {
        *counts
            .entry((record.original.clone(), record.replacement.clone()))
            .or_default() += 1;
    }

    let mut entries: Vec<StatsEntry> = counts
        .into_iter()
        .map(|((original, replacement), count)| StatsEntry {
            original,
            replacement,
            count,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.count
            .cmp(&b.count)
            .then_with(|| a.original.cmp(&b.original))
    });

    if json {
        let report = StatsReport {
            total_refactors: records.len(),
            modified_files,
            counts: entries,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["From", "To", "Count"]);
    for entry in &entries {
        table.add_row(vec![
            entry.original.to_string(),
            entry.replacement.to_string(),
            entry.count.to_string(),
        ]);
    }
    writeln!(writer, "{table}")?;
    writeln!(
        writer,
        "{} assertions (in {} files) have been refactored.",
        records.len(),
        modified_files
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_for(paths: Vec<PathBuf>) -> Cli {
        Cli {
            paths,
            ..Cli::default()
        }
    }

    #[test]
    fn test_run_reports_nothing_to_refactor() {
        let cli = cli_for(Vec::new());
        let mut buffer = Vec::new();
        let code = run(&cli, &mut buffer).unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(buffer).unwrap().contains("Nothing to refactor!"));
    }

    #[test]
    fn test_run_rewrites_matching_files() {
        let dir = TempDir::new().unwrap();
        let test_file = dir.path().join("test_sample.py");
        fs::write(&test_file, "self.assertTrue(x == y)\n").unwrap();
        let other_file = dir.path().join("helpers.py");
        fs::write(&other_file, "self.assertTrue(x == y)\n").unwrap();

        let cli = cli_for(vec![dir.path().to_path_buf()]);
        let mut buffer = Vec::new();
        let code = run(&cli, &mut buffer).unwrap();
        assert_eq!(code, 0);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("reformatted"));
        assert!(output.contains("All done!"));
        assert!(output.contains("1 reformatted"));

        assert_eq!(
            fs::read_to_string(&test_file).unwrap(),
            "self.assertEqual(x, y)\n"
        );
        // Not matching the pattern, so untouched.
        assert_eq!(
            fs::read_to_string(&other_file).unwrap(),
            "self.assertTrue(x == y)\n"
        );
    }

    #[test]
    fn test_run_fail_on_change() {
        let dir = TempDir::new().unwrap();
        let test_file = dir.path().join("test_sample.py");
        fs::write(&test_file, "self.assertTrue(x == y)\n").unwrap();

        let cli = Cli {
            paths: vec![dir.path().to_path_buf()],
            fail_on_change: true,
            ..Cli::default()
        };
        let mut buffer = Vec::new();
        assert_eq!(run(&cli, &mut buffer).unwrap(), 1);

        // Second run reaches the fixpoint immediately: nothing changes.
        let mut buffer = Vec::new();
        assert_eq!(run(&cli, &mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_run_reports_parse_errors_and_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test_bad.py"), "def broken(:\n").unwrap();
        fs::write(
            dir.path().join("test_good.py"),
            "self.assertTrue(x == y)\n",
        )
        .unwrap();

        let cli = cli_for(vec![dir.path().to_path_buf()]);
        let mut buffer = Vec::new();
        let code = run(&cli, &mut buffer).unwrap();
        assert_eq!(code, 0);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("error:"));
        assert!(output.contains("test_bad.py"));
        assert!(output.contains("reformatted"));
    }

    #[test]
    fn test_explicit_file_bypasses_pattern() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("helpers.py");
        fs::write(&file, "self.assertIs(x, None)\n").unwrap();

        let cli = cli_for(vec![file.clone()]);
        let mut buffer = Vec::new();
        run(&cli, &mut buffer).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "self.assertIsNone(x)\n");
    }

    #[test]
    fn test_skip_flag_blacklists_handler() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test_sample.py");
        fs::write(&file, "self.assertTrue(x == y)\n").unwrap();

        let cli = Cli {
            paths: vec![dir.path().to_path_buf()],
            skip: vec!["assertTrue".to_owned()],
            ..Cli::default()
        };
        let mut buffer = Vec::new();
        run(&cli, &mut buffer).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "self.assertTrue(x == y)\n"
        );
    }

    #[test]
    fn test_stats_output() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("test_sample.py"),
            "self.assertTrue(x == y)\nself.assertEquals(a, b)\n",
        )
        .unwrap();

        let cli = Cli {
            paths: vec![dir.path().to_path_buf()],
            show_stats: true,
            ..Cli::default()
        };
        let mut buffer = Vec::new();
        run(&cli, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("assertEqual"));
        assert!(output.contains("2 assertions (in 1 files) have been refactored."));
    }

    #[test]
    fn test_config_skip_is_merged() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".assertup.toml"),
            "[assertup]\nskip = [\"assertTrue\"]\n",
        )
        .unwrap();
        let file = dir.path().join("test_sample.py");
        fs::write(&file, "self.assertTrue(x == y)\nself.assertEquals(a, b)\n").unwrap();

        let cli = cli_for(vec![dir.path().to_path_buf()]);
        let mut buffer = Vec::new();
        run(&cli, &mut buffer).unwrap();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "self.assertTrue(x == y)\nself.assertEqual(a, b)\n"
        );
    }
}
