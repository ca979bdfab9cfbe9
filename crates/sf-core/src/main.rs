//! sparkify-etl binary entry point.

use clap::Parser;
use sf_core::cli::{init_logging, run_cli, Cli};
use sf_core::ExitCode;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_format, cli.verbose) {
        eprintln!("sparkify-etl: failed to initialize logging: {err}");
        std::process::exit(ExitCode::InternalError.as_i32());
    }
    let code = run_cli(cli);
    std::process::exit(code.as_i32());
}
