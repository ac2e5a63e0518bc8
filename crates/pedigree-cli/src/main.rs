//! Pedigree CLI - Render clinical pedigree charts from JSON family records

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized inside run() from the flags and environment
    let mut app = cli::PedigreeApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
