use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

mod contact;
mod list;
mod post;
mod watch;

pub use contact::{ContactArgs, handle_contact};
pub use list::{ListArgs, handle_list};
pub use post::{PostArgs, handle_post};
pub use watch::{WatchArgs, handle_watch};

use crate::board::Lifetime;
use crate::common::{BoardConfig, SystemEnvProvider};

#[derive(Parser)]
#[command(name = "comment-board")]
#[command(about = "A live comment board with photo uploads")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Board directory (defaults to $COMMENT_BOARD_DIR or ./.comment-board)
    #[arg(short, long, global = true)]
    pub dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Post a comment, optionally with a photo
    Post(PostArgs),
    /// List comments, newest first
    List(ListArgs),
    /// Follow the board live until interrupted
    Watch(WatchArgs),
    /// Send an inquiry email
    Contact(ContactArgs),
}

pub async fn run_command(cli: Cli) -> Result<()> {
    let config = BoardConfig::from_env(&SystemEnvProvider).with_board_dir(cli.dir);

    match cli.command {
        Commands::Post(args) => handle_post(&config, args).await,
        Commands::List(args) => handle_list(&config, args).await,
        Commands::Watch(args) => handle_watch(&config, args).await,
        Commands::Contact(args) => handle_contact(&config, args).await,
    }
}

/// Cancel `lifetime` when the user presses Ctrl+C.
pub(crate) fn cancel_on_ctrl_c(lifetime: &Lifetime) {
    let lifetime = lifetime.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            lifetime.cancel();
        }
    });
}
