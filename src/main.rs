use std::env::var;

use clap::Parser;
use miette::Result;
use release_notes::Cli;

fn main() -> Result<()> {
    if var("RUST_LOG").is_ok() {
        env_logger::init();
    }
    release_notes::run(Cli::parse())
}
