use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use crate::board::{BoardError, CommentForm, Lifetime};
use crate::cli::output::{info_message, spinner, success_message, warning_message};
use crate::common::{BoardConfig, CommentDraft, PhotoFile, PhotoReadError};
use crate::services::{CloudinaryHost, ImageHost};
use crate::storage::{CommentStore, LocalCommentStore};

use super::cancel_on_ctrl_c;

#[derive(Args)]
pub struct PostArgs {
    /// Your name as shown on the board
    #[arg(short, long)]
    pub name: Option<String>,

    /// Comment text (opens $EDITOR when name or message is missing)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Photo to attach (JPEG, PNG, GIF or WebP, up to 5MB)
    #[arg(short, long)]
    pub photo: Option<PathBuf>,
}

pub async fn handle_post(config: &BoardConfig, args: PostArgs) -> Result<()> {
    let store = LocalCommentStore::open_or_init(&config.board_dir).await?;
    let host = CloudinaryHost::new(
        &config.cloudinary_cloud_name,
        config.cloudinary_upload_preset.clone(),
    );

    let draft = match (args.name, args.message) {
        (Some(name), Some(message)) => CommentDraft::new(name, message),
        (name, message) => compose_in_editor(name, message)?,
    };

    let lifetime = Lifetime::new();
    cancel_on_ctrl_c(&lifetime);

    post_comment(&store, &host, lifetime, draft, args.photo).await
}

pub(crate) async fn post_comment(
    store: &dyn CommentStore,
    host: &dyn ImageHost,
    lifetime: Lifetime,
    draft: CommentDraft,
    photo: Option<PathBuf>,
) -> Result<()> {
    let mut form = CommentForm::new(lifetime);
    form.set_name(draft.name);
    form.set_message(draft.message);

    if let Some(path) = photo {
        let photo = match PhotoFile::read(&path).await {
            Ok(photo) => photo,
            Err(PhotoReadError::Invalid(e)) => return Err(e.into()),
            Err(PhotoReadError::Io(e)) => {
                return Err(e).with_context(|| format!("Failed to read photo {}", path.display()));
            }
        };

        let pending = form.select_photo(photo)?;
        let file_name = pending.file_name().to_string();

        let progress = spinner("Uploading photo...");
        let uploaded = form.upload_photo(host, pending).await;
        progress.finish_and_clear();

        match uploaded {
            Ok(url) => {
                println!("{}", info_message(&format!("Uploaded {} to {}", file_name, url)));
            }
            // The comment can still go out without its photo
            Err(BoardError::Upload(e)) => {
                let banner = form
                    .banner_at(Instant::now())
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                eprintln!(
                    "{}",
                    warning_message(&format!("{}; posting without photo", banner))
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    let progress = spinner("Posting comment...");
    let posted = form.submit(store).await;
    progress.finish_and_clear();
    let comment = posted?;

    println!(
        "{}",
        success_message(&format!("Posted comment by {}", comment.name))
    );
    Ok(())
}

fn compose_in_editor(name: Option<String>, message: Option<String>) -> Result<CommentDraft> {
    let template = create_template(name.as_deref(), message.as_deref())?;

    let mut temp_file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    writeln!(temp_file, "{}", template)?;
    temp_file.flush()?;

    edit::edit_file(temp_file.path())?;

    let edited_content = fs::read_to_string(temp_file.path())?;
    let draft = parse_template(&edited_content)?;
    if draft.is_empty() {
        anyhow::bail!("Aborting: the comment is empty");
    }
    Ok(draft)
}

fn create_template(name: Option<&str>, message: Option<&str>) -> Result<String> {
    let draft = CommentDraft::new(name.unwrap_or_default(), message.unwrap_or_default());
    let body = serde_yaml::to_string(&draft).context("Failed to build comment template")?;

    Ok(format!(
        "# Write your comment below. Save and close to post it.\n\
         # Both name and message are required.\n\n{}",
        body
    ))
}

fn parse_template(content: &str) -> Result<CommentDraft> {
    let draft: CommentDraft = serde_yaml::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse YAML: {}", e))?;
    Ok(draft)
}
