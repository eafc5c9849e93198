// include-fixer/src/main.rs

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    include_fixer::commands::run_cli()
}
