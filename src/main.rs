use clap::Parser;
use tascore::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
