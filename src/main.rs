use clap::Parser;

use cinetrack::cli::Cli;

fn main() -> anyhow::Result<()> {
    cinetrack::run(Cli::parse())
}
