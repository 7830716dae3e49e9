//! CLI argument definitions using clap.

use clap::Parser;

/// Pathway: normalize the legacy student dataset.
///
/// Reads `dev/cademycode.db`, rebuilds `dev/cademycode_updated.db`, writes
/// `dev/cademycode_updated.csv` and logs to `dev/changelog.log` and
/// `dev/error.log`. Set `RUST_LOG` to control console output.
#[derive(Parser)]
#[command(name = "pathway")]
#[command(version, about, long_about = None)]
pub struct Cli {}
