//! Locus CLI
//!
//! Offline debugging for selector resolution: resolve a selector against a
//! recorded hierarchy dump, or print the dump as an indexed tree.
//!
//! Usage from workspace root:
//!   cargo run --bin locus -- resolve -H dump.xml -p android -s "text:Login && below:text:Header"
//!   cargo run --bin locus -- resolve -H dump.xml -p ios --selector-file step.yaml --json
//!   cargo run --bin locus -- dump -H dump.xml -p android

use crate::cli::{Cli, Commands};
use crate::command::{handle_dump_command, handle_resolve_command};

mod cli;
mod command;
mod utils;

fn main() {
    use clap::Parser;
    let cli = Cli::parse();
    utils::init_logging();

    let result = match cli.command {
        Commands::Resolve(args) => handle_resolve_command(args),
        Commands::Dump(args) => handle_dump_command(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
