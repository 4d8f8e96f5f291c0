use clap::Parser;
use finledger::cli::{Cli, init_logger, run};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    run(cli)
}
