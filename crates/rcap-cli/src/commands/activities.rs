use super::utils::{empty, field, heading, require_session, success};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::activity::{Activity, ActivityFilters, ActivityStatus, ActivityType, NewActivity};

pub async fn list(
    ctx: &AppContext,
    page: Option<u32>,
    status: Option<ActivityStatus>,
    activity_type: Option<ActivityType>,
    organisation_id: Option<u64>,
) -> Result<()> {
    require_session(ctx).await?;
    let page = ctx
        .activities
        .fetch_activities(&ActivityFilters {
            page,
            status,
            activity_type,
            organisation_id,
        })
        .await?;

    if page.items.is_empty() {
        empty("activities");
        return Ok(());
    }
    for activity in &page.items {
        println!(
            "{:>6}  {}  {:<10} {:<9} {}",
            format!("#{}", activity.id).dimmed(),
            activity.date,
            status_label(activity.status),
            activity.activity_type,
            activity.title
        );
    }
    if let Some(meta) = &page.meta {
        if let (Some(current), Some(last)) = (meta.current_page, meta.last_page) {
            println!("{}", format!("Page {} of {}", current, last).dimmed());
        }
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let activity = ctx.activities.fetch_activity(id).await?;
    print_activity(&activity);
    Ok(())
}

pub async fn create(ctx: &AppContext, draft: NewActivity) -> Result<()> {
    require_session(ctx).await?;
    let activity = ctx.activities.create_activity(&draft).await?;
    success(&format!("Created draft #{}", activity.id));
    Ok(())
}

pub async fn submit(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let activity = ctx.activities.submit_activity(id).await?;
    success(&format!("Activity #{} is now {}", activity.id, activity.status));
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    ctx.activities.delete_activity(id).await?;
    success(&format!("Deleted activity #{}", id));
    Ok(())
}

fn print_activity(activity: &Activity) {
    heading(&activity.title);
    field("id", activity.id);
    field("status", status_label(activity.status));
    field("type", activity.activity_type);
    field("date", &activity.date);
    if !activity.location.is_empty() {
        field("location", &activity.location);
    }
    if let Some(organisation) = &activity.organisation {
        field("organisation", &organisation.name);
    }
    if let Some(user) = &activity.user {
        field("reported by", &user.name);
    }
    if let Some(tags) = activity.tags.as_ref().filter(|tags| !tags.is_empty()) {
        let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
        field("tags", names.join(", "));
    }
    if let Some(evidence) = activity.evidence.as_ref().filter(|files| !files.is_empty()) {
        field("evidence", format!("{} file(s)", evidence.len()));
    }
    if !activity.description.is_empty() {
        println!();
        println!("{}", activity.description);
    }
}

fn status_label(status: ActivityStatus) -> colored::ColoredString {
    let label = status.as_ref();
    match status {
        ActivityStatus::Draft => label.dimmed(),
        ActivityStatus::Submitted => label.blue(),
        ActivityStatus::Approved => label.green(),
        ActivityStatus::Rejected => label.red(),
    }
}
