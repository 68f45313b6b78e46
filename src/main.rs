// chainquery - query the block files of a Bitcoin full node

use chainquery::{Cli, CliHandler};
use clap::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let handler = match CliHandler::new(&cli.blocks_dir, cli.json) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error loading block files: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = handler.handle(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
