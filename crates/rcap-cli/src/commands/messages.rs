use super::utils::{empty, field, heading, require_session, success};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::message::{Message, MessageFilters, NewMessage};

pub async fn list(ctx: &AppContext, page: Option<u32>, unread: bool) -> Result<()> {
    require_session(ctx).await?;
    let page = ctx
        .messages
        .fetch_messages(&MessageFilters {
            page,
            unread_only: unread.then_some(true),
        })
        .await?;

    if page.items.is_empty() {
        empty("messages");
    }
    for message in &page.items {
        let urgent = if message.is_urgent { "!".red().bold() } else { " ".normal() };
        println!(
            "{:>6} {} {}  {:<20} {}",
            format!("#{}", message.id).dimmed(),
            urgent,
            message.created_at.format("%Y-%m-%d %H:%M"),
            message.sender.name,
            message.subject
        );
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let message = ctx.messages.fetch_message(id).await?;
    print_message(&message);
    Ok(())
}

pub async fn send(ctx: &AppContext, message: NewMessage) -> Result<()> {
    if message.recipient_id.is_none() && message.organisation_id.is_none() && message.role.is_none() {
        anyhow::bail!("Pick a recipient with --to, --organisation-id or --role");
    }
    require_session(ctx).await?;
    let sent = ctx.messages.send_message(&message).await?;
    success(&format!("Sent message #{}", sent.id));
    Ok(())
}

pub async fn read(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    ctx.messages.mark_as_read(id).await?;
    success(&format!("Marked message #{} as read", id));
    Ok(())
}

pub async fn reply(ctx: &AppContext, id: u64, body: String) -> Result<()> {
    require_session(ctx).await?;
    let reply = ctx.messages.reply_to_message(id, &body).await?;
    success(&format!("Replied with message #{}", reply.id));
    Ok(())
}

fn print_message(message: &Message) {
    heading(&message.subject);
    field("from", format!("{} <{}>", message.sender.name, message.sender.email));
    let recipients: Vec<&str> = message
        .recipients
        .iter()
        .map(|recipient| recipient.user_name.as_str())
        .collect();
    if !recipients.is_empty() {
        field("to", recipients.join(", "));
    }
    field("sent", message.created_at.format("%Y-%m-%d %H:%M"));
    if message.is_urgent {
        field("priority", "urgent".red());
    }
    println!();
    println!("{}", message.body);
}
