use anyhow::Result;
use clap::Args;

use crate::board::{InquiryForm, Lifetime};
use crate::cli::output::{spinner, success_message};
use crate::common::{BoardConfig, InquiryDraft};
use crate::services::{EmailJsMailer, Mailer};

use super::cancel_on_ctrl_c;

#[derive(Args)]
pub struct ContactArgs {
    /// Your name
    #[arg(short, long)]
    pub name: String,

    /// Address to reply to
    #[arg(short, long)]
    pub email: String,

    /// What you would like to discuss
    #[arg(short, long)]
    pub message: String,
}

pub async fn handle_contact(config: &BoardConfig, args: ContactArgs) -> Result<()> {
    let mailer = EmailJsMailer::new(
        config.emailjs_service_id.clone(),
        config.emailjs_template_id.clone(),
        config.emailjs_public_key.clone(),
    );

    let lifetime = Lifetime::new();
    cancel_on_ctrl_c(&lifetime);

    send_inquiry(
        &mailer,
        lifetime,
        InquiryDraft::new(args.name, args.email, args.message),
    )
    .await
}

async fn send_inquiry(mailer: &dyn Mailer, lifetime: Lifetime, draft: InquiryDraft) -> Result<()> {
    let mut form = InquiryForm::with_draft(lifetime, draft);

    let progress = spinner("Sending message...");
    let sent = form.send(mailer).await;
    progress.finish_and_clear();
    sent?;

    println!("{}", success_message("Message sent"));
    Ok(())
}
