//! Main binary entry point for the `assertup` assertion-rewriting tool.
//!
//! This binary simply delegates to the shared `commands::run_with_args()`
//! function to ensure consistent behavior across all entry points.

use anyhow::Result;

fn main() -> Result<()> {
    // Delegate CLI args to the shared entry function (same as assertup-cli)
    let code = assertup::commands::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
