use clap::Parser;
use futdash::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
