use anyhow::Result;
use chrono::Utc;
use clap::Args;
use console::Term;

use crate::board::{Feed, Lifetime};
use crate::cli::output::{format_feed, info_message};
use crate::common::BoardConfig;
use crate::storage::LocalCommentStore;

use super::cancel_on_ctrl_c;

#[derive(Args)]
pub struct WatchArgs {
    /// One line per comment
    #[arg(short, long)]
    pub compact: bool,
}

pub async fn handle_watch(config: &BoardConfig, args: WatchArgs) -> Result<()> {
    let store = LocalCommentStore::open_or_init(&config.board_dir).await?;
    let lifetime = Lifetime::new();
    cancel_on_ctrl_c(&lifetime);

    let mut feed = Feed::open(&store, lifetime)?;
    let watcher = store.spawn_change_watcher(config.watch_interval);
    let term = Term::stdout();

    while let Some(view) = feed.next().await {
        term.clear_screen()?;
        print!("{}", format_feed(&view, args.compact, Utc::now()));
        println!("{}", info_message("Watching for new comments, press Ctrl+C to stop"));
    }

    drop(feed);
    watcher.abort();
    println!("{}", info_message("Stopped watching"));
    Ok(())
}
