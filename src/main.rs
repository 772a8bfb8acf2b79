use clap::Parser;
use env_logger::Env;

mod board;
mod cli;
mod common;
mod services;
mod storage;

use cli::{Cli, run_command};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run_command(cli).await {
        eprintln!("{}", cli::error_message(&err.to_string()));
        std::process::exit(1);
    }
}
