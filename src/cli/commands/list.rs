use anyhow::Result;
use chrono::Utc;
use clap::Args;

use crate::board::FeedView;
use crate::cli::output::format_feed;
use crate::common::BoardConfig;
use crate::storage::{CommentStore, LocalCommentStore};

#[derive(Args)]
pub struct ListArgs {
    /// One line per comment
    #[arg(short, long)]
    pub compact: bool,
}

pub async fn handle_list(config: &BoardConfig, args: ListArgs) -> Result<()> {
    let store = LocalCommentStore::open_or_init(&config.board_dir).await?;
    print!("{}", render_list(&store, args.compact).await?);
    Ok(())
}

async fn render_list(store: &dyn CommentStore, compact: bool) -> Result<String> {
    let view = FeedView::from_snapshot(store.snapshot().await?);
    Ok(format_feed(&view, compact, Utc::now()))
}
