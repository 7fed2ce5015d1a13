//! Tiller CLI - Command-line interface for Tiller migrations and seeders.

use clap::Parser;

use tiller_cli::cli::Cli;
use tiller_cli::commands::{self, Units};
use tiller_cli::{logging, output};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::run(cli, &Units::default()) {
        output::blank();
        output::message(output::Tone::Error, &e.to_string());
        std::process::exit(1);
    }
}
