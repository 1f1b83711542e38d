mod cli;
mod commands;

pub use cli::CliError;

pub fn run() -> Result<(), CliError> {
    cli::run()
}
