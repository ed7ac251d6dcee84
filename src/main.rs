use anyhow::Result;
use clap::Parser;

use hooksmith::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    hooksmith::init_tracing();
    let cli = Cli::parse();
    cli.run().await
}
