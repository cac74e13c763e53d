//! Command-line interface entry point for `assertup`.

use anyhow::Result;
use assertup::commands;
fn main() -> Result<()> {
    // Delegate CLI args to the shared entry function
    let code = commands::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
