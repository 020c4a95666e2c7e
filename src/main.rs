use clap::Parser;
use dirsort::cli::{Cli, run_cli};
use dirsort::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(message) = run_cli(&cli) {
        OutputFormatter::error(&message);
        std::process::exit(1);
    }
}
