use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(author, version, about = "An in-memory hierarchical namespace engine", long_about = None)]
#[command(name = "ntree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a namespace script from a file, or from standard input
    Script {
        /// Script file to run; reads standard input when omitted
        file: Option<PathBuf>,
        /// Tree flavor: binary, directory, or filesystem
        #[arg(short, long, default_value = "directory")]
        flavor: String,
    },
    /// Walk a fixed script that exercises each operation and status
    Demo {
        /// Tree flavor: binary, directory, or filesystem
        #[arg(short, long, default_value = "filesystem")]
        flavor: String,
    },
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();
    let cli = Cli::parse();
    match cli.command {
        Commands::Script { file, flavor } => {
            let flavor = commands::parse_flavor(&flavor)?;
            commands::script::script_command(file.as_deref(), flavor)
        }
        Commands::Demo { flavor } => {
            let flavor = commands::parse_flavor(&flavor)?;
            commands::demo::demo_command(flavor)
        }
    }
}
