mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{dump::DumpArgs, types::TypesArgs};

#[derive(Parser)]
#[command(name = "pbzcat", about = "Inspect pbz streams of protobuf messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every message in the stream
    Dump(DumpArgs),
    /// Count messages per type name
    Types(TypesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump(args) => args.run(),
        Commands::Types(args) => args.run(),
    }
}
