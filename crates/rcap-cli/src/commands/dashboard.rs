use super::utils::{field, heading, require_session};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;

pub async fn show(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let session = ctx.auth.session().await;
    let summary = ctx.dashboard.fetch_for_session(session.as_ref()).await?;

    heading("Dashboard");
    field("activities", summary.total_activities);
    field("draft", summary.by_status.draft);
    field("submitted", summary.by_status.submitted);
    field("approved", summary.by_status.approved);
    field("rejected", summary.by_status.rejected);

    if !summary.by_type.is_empty() {
        println!();
        heading("By type");
        for (activity_type, count) in &summary.by_type {
            field(activity_type, count);
        }
    }

    if !summary.recent_activities.is_empty() {
        println!();
        heading("Recent");
        for activity in &summary.recent_activities {
            println!(
                "  {:>6}  {}  {:<10} {}",
                format!("#{}", activity.id).dimmed(),
                activity.date,
                activity.status,
                activity.title
            );
        }
    }
    Ok(())
}
