// include-fixer/src/commands.rs

use anyhow::{
    Context,
    Result
};
use clap::Parser;
use std::{
    path::PathBuf,
    process::ExitCode
};
use tracing_subscriber::EnvFilter;
use crate::{
    fix::{
        self,
        Mode
    },
    inventory::{
        HeaderInventory,
        DEFAULT_HEADER_EXTENSIONS
    },
    rewrite::{
        IncludeRule,
        DEFAULT_PROJECT_PREFIX
    },
    summary::RunSummary
};


pub const DEFAULT_HEADER_ROOT: &str = "serene/src";

/// Normalize `#include` delimiters: project headers get `"..."`, everything
/// else gets `<...>`.
#[derive(Debug, Parser)]
#[command(name = "include-fixer", version)]
pub struct Cli {
    /// Files to rewrite in place (the caller filters by extension).
    pub files: Vec<PathBuf>,

    /// Project header root, scanned recursively for headers.
    #[arg(long, default_value = DEFAULT_HEADER_ROOT)]
    pub root: PathBuf,

    /// Include paths starting with this prefix are always project headers.
    #[arg(long, default_value = DEFAULT_PROJECT_PREFIX)]
    pub prefix: String,

    /// Header file extension (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Report files that would change without writing; exit 1 if any would.
    #[arg(long)]
    pub check: bool,

    /// Print a JSON summary on stdout.
    #[arg(long)]
    pub json: bool,

    /// Debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.check { Mode::Check } else { Mode::Write }
    }

    pub fn header_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_HEADER_EXTENSIONS.iter().map(|s| (*s).to_string()).collect()
        } else {
            self.extensions.clone()
        }
    }
}

pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let summary = run(&cli)?;

    if cli.json {
        let out = serde_json::to_string_pretty(&summary.to_json())
            .context("serializing run summary")?;
        println!("{out}");
    }

    if summary.mode == Mode::Check && summary.files_changed() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Build the inventory once, then fix files in argument order.
/// The first failing file aborts the run.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let mode = cli.mode();
    let inventory = HeaderInventory::scan(&cli.root, &cli.header_extensions())
        .context("building header inventory")?;
    if inventory.is_empty() {
        tracing::warn!(root = %cli.root.display(), "no headers found; only the prefix rule will quote includes");
    }

    let rule = IncludeRule::new(inventory, cli.prefix.clone());
    let mut summary = RunSummary::new(mode, rule.inventory().len());

    for path in &cli.files {
        let outcome = fix::fix_file(path, &rule, mode)?;
        if outcome.changed {
            match mode {
                Mode::Write => {
                    tracing::info!(path = %path.display(), lines = outcome.changed_lines, "fixed includes");
                    println!("fixed {}", path.display());
                }
                Mode::Check => println!("would fix {}", path.display()),
            }
        }
        summary.push(outcome);
    }
    Ok(summary)
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "include_fixer=debug" } else { "include_fixer=info" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn cli_for(root: &std::path::Path, files: &[PathBuf], extra: &[&str]) -> Cli {
        let mut argv: Vec<String> = vec!["include-fixer".into(), "--root".into(), root.display().to_string()];
        argv.extend(extra.iter().map(|s| (*s).to_string()));
        argv.extend(files.iter().map(|p| p.display().to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["include-fixer"]).unwrap();
        assert!(cli.files.is_empty());
        assert_eq!(cli.root, PathBuf::from("serene/src"));
        assert_eq!(cli.prefix, "serene/");
        assert_eq!(cli.header_extensions(), vec!["h".to_string()]);
        assert_eq!(cli.mode(), Mode::Write);
    }

    #[test]
    fn repeated_ext_and_check() {
        let cli = Cli::try_parse_from(["include-fixer", "--ext", "h", "--ext", "hpp", "--check", "a.cpp"]).unwrap();
        assert_eq!(cli.header_extensions(), vec!["h".to_string(), "hpp".to_string()]);
        assert_eq!(cli.mode(), Mode::Check);
        assert_eq!(cli.files, vec![PathBuf::from("a.cpp")]);
    }

    #[test]
    fn run_fixes_files_against_scanned_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("serene/src");
        fs::create_dir_all(root.join("jit")).unwrap();
        fs::write(root.join("jit/jit.h"), "").unwrap();

        let target = dir.path().join("main.cpp");
        fs::write(&target, "#include <jit/jit.h>\n#include \"llvm/IR/Module.h\"\n").unwrap();

        let summary = run(&cli_for(&root, &[target.clone()], &[])).unwrap();
        assert_eq!(summary.inventory_size, 1);
        assert_eq!(summary.files_changed(), 1);
        assert_eq!(summary.lines_changed(), 2);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "#include \"jit/jit.h\"\n#include <llvm/IR/Module.h>\n"
        );
    }

    #[test]
    fn check_mode_counts_changes_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.cpp");
        fs::write(&target, "#include \"vector\"\n").unwrap();

        let summary = run(&cli_for(dir.path(), &[target.clone()], &["--check"])).unwrap();
        assert_eq!(summary.mode, Mode::Check);
        assert_eq!(summary.files_changed(), 1);
        assert_eq!(fs::read_to_string(&target).unwrap(), "#include \"vector\"\n");
    }

    #[test]
    fn missing_file_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.cpp");
        let later = dir.path().join("later.cpp");
        fs::write(&later, "#include \"vector\"\n").unwrap();

        let err = run(&cli_for(dir.path(), &[missing, later.clone()], &[])).unwrap_err();
        assert!(format!("{err:#}").contains("missing.cpp"));
        assert_eq!(fs::read_to_string(&later).unwrap(), "#include \"vector\"\n");
    }

    #[test]
    fn non_utf8_file_does_not_stop_later_files() {
        let dir = tempfile::tempdir().unwrap();
        let latin1 = dir.path().join("latin1.cpp");
        let later = dir.path().join("later.cpp");
        fs::write(&latin1, b"// Caf\xE9\n#include \"vector\"\n").unwrap();
        fs::write(&later, "#include \"map\"\n").unwrap();

        let summary = run(&cli_for(dir.path(), &[latin1.clone(), later.clone()], &[])).unwrap();
        assert_eq!(summary.files_changed(), 2);
        assert_eq!(fs::read(&latin1).unwrap(), b"// Caf\xE9\n#include <vector>\n");
        assert_eq!(fs::read_to_string(&later).unwrap(), "#include <map>\n");
    }

    #[test]
    fn missing_root_fails_even_with_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&cli_for(&dir.path().join("absent"), &[], &[])).unwrap_err();
        assert!(format!("{err:#}").contains("header inventory"));
    }

    #[test]
    fn empty_file_list_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&cli_for(dir.path(), &[], &[])).unwrap();
        assert!(summary.files.is_empty());
    }
}
