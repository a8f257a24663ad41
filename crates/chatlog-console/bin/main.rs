use clap::{Parser, Subcommand};
use colored::Colorize;

mod cmd;
mod logging;

use cmd::console::ConsoleArgs;
use cmd::dump::DumpArgs;

#[derive(Debug, Parser)]
#[command(
    name = "chatlog-console",
    version,
    about = "Browse and search a month of chat logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive log viewer
    Console(ConsoleArgs),
    /// Print a month of logs and exit
    Dump(DumpArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Console(args) => args.run(),
        Command::Dump(args) => args.run(),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
