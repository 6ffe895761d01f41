//! Trolley CLI

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    cli::logging::init_subscriber(&cli.logging)?;

    cli.run()
}
