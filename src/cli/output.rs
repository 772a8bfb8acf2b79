use crate::board::FeedView;
use crate::common::{Comment, optimized_image_url};
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EMPTY_BOARD_MESSAGE: &str = "No comments yet. Be the first to comment!";

const AVATAR_SIZE: u32 = 100;

fn format_time_ago(duration: Duration) -> String {
    let seconds = duration.as_secs();

    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    if seconds < 60 * 60 {
        return format!("{}m ago", seconds / 60);
    }
    if seconds < 24 * 60 * 60 {
        return format!("{}h ago", seconds / (60 * 60));
    }
    format!("{}d ago", seconds / (24 * 60 * 60))
}

/// Age of a comment relative to `now`. Timestamps slightly in the future
/// (clock skew with the store) count as zero seconds.
pub fn format_comment_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_time_ago((now - timestamp).to_std().unwrap_or_default())
}

pub fn format_comment_compact(comment: &Comment, now: DateTime<Utc>) -> String {
    let first_line = comment.message.lines().next().unwrap_or_default();
    let ellipsis = if comment.message.lines().count() > 1 {
        " …"
    } else {
        ""
    };

    format!(
        "{} {}: {}{}",
        style(format!("[{}]", format_comment_age(comment.timestamp, now))).dim(),
        style(&comment.name).bold(),
        first_line,
        ellipsis
    )
}

pub fn format_comment_detailed(comment: &Comment, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    let avatar = match &comment.photo_url {
        Some(url) => style(optimized_image_url(url, AVATAR_SIZE, AVATAR_SIZE))
            .cyan()
            .to_string(),
        None => style(format!("({})", comment.initial())).bold().to_string(),
    };

    output.push_str(&format!(
        "{} {}  {}\n",
        avatar,
        style(&comment.name).green().bold(),
        style(format!(
            "{} ({})",
            format_comment_age(comment.timestamp, now),
            comment.timestamp.format("%Y-%m-%d %H:%M")
        ))
        .dim()
    ));

    for line in comment.message.lines() {
        output.push_str(&format!("    {}\n", line));
    }

    output
}

pub fn format_feed(view: &FeedView, compact: bool, now: DateTime<Utc>) -> String {
    let comments = match view {
        FeedView::Empty => return format!("{}\n", style(EMPTY_BOARD_MESSAGE).dim()),
        FeedView::Comments(comments) => comments,
    };

    let mut output = format!(
        "{}\n\n",
        style(format!("Comments ({})", comments.len())).bold().cyan()
    );

    for comment in comments {
        if compact {
            output.push_str(&format_comment_compact(comment, now));
            output.push('\n');
        } else {
            output.push_str(&format_comment_detailed(comment, now));
            output.push('\n');
        }
    }

    output
}

/// Spinner shown while a network call is in flight.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn success_message(message: &str) -> String {
    format!("{} {}", style("✓").green().bold(), message)
}

pub fn error_message(message: &str) -> String {
    format!("{} {}", style("✗").red().bold(), message)
}

pub fn warning_message(message: &str) -> String {
    format!("{} {}", style("⚠").yellow().bold(), message)
}

pub fn info_message(message: &str) -> String {
    format!("{} {}", style("ℹ").blue().bold(), message)
}
