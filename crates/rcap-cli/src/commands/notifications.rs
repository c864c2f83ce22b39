use super::utils::{empty, require_session, success};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::notification::{Notification, NotificationFilters};

/// Notifications shown when `watch` starts.
const WATCH_BACKLOG: u32 = 5;

pub async fn list(ctx: &AppContext, limit: Option<u32>, unread: bool) -> Result<()> {
    require_session(ctx).await?;
    let notifications = ctx
        .notifications
        .fetch_notifications(&NotificationFilters {
            limit,
            unread_only: unread.then_some(true),
        })
        .await?;

    if notifications.is_empty() {
        empty("notifications");
    }
    for notification in &notifications {
        print_notification(notification);
    }
    Ok(())
}

pub async fn unread(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let count = ctx.notifications.fetch_unread_count().await;
    println!("{}", count);
    Ok(())
}

pub async fn read(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    ctx.notifications.mark_as_read(id).await?;
    success(&format!("Marked notification #{} as read", id));
    Ok(())
}

pub async fn read_all(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    ctx.notifications.mark_all_as_read().await?;
    success("Marked all notifications as read");
    Ok(())
}

/// Runs the notification poller and prints what it picks up until Ctrl-C or
/// until the session ends.
pub async fn watch(ctx: &AppContext) -> Result<()> {
    if !ctx.start().await {
        anyhow::bail!("Not signed in. Run `rcap login` first.");
    }

    let mut seen = ctx
        .notifications
        .fetch_notifications(&NotificationFilters::latest(WATCH_BACKLOG))
        .await?;
    for notification in seen.iter().rev() {
        print_notification(notification);
    }
    let mut unread = ctx.notifications.fetch_unread_count().await;
    println!(
        "{}",
        format!(
            "{} unread. Polling every {}s, press Ctrl-C to stop.",
            unread,
            ctx.poller.period().as_secs()
        )
        .dimmed()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(ctx.poller.period());
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if !ctx.poller.is_running() {
                    anyhow::bail!("Polling stopped because the session ended");
                }

                let latest = ctx.notifications.notifications().await;
                for notification in fresh(&seen, &latest).into_iter().rev() {
                    print_notification(notification);
                }
                seen = latest;

                let count = ctx.notifications.unread_count().await;
                if count != unread {
                    println!("{}", format!("{} unread", count).dimmed());
                    unread = count;
                }
            }
        }
    }

    ctx.stop();
    Ok(())
}

/// Entries of `latest` that were not in `seen`.
fn fresh<'a>(seen: &[Notification], latest: &'a [Notification]) -> Vec<&'a Notification> {
    latest
        .iter()
        .filter(|notification| !seen.iter().any(|old| old.id == notification.id))
        .collect()
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_urgent() {
        "!".red().bold()
    } else if notification.is_unread() {
        "•".blue()
    } else {
        " ".normal()
    };
    println!(
        "{} {:>6}  {}  {:<8} {}",
        marker,
        format!("#{}", notification.id).dimmed(),
        notification.created_at.format("%Y-%m-%d %H:%M"),
        notification.kind,
        notification.title
    );
    if !notification.body.is_empty() {
        println!("           {}", notification.body.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcap_core::notification::NotificationKind;

    fn notification(id: u64) -> Notification {
        Notification {
            id,
            kind: NotificationKind::Message,
            title: format!("Notification {}", id),
            body: String::new(),
            link: None,
            read_at: None,
            created_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_fresh_keeps_only_new_ids() {
        let seen = vec![notification(2), notification(1)];
        let latest = vec![notification(4), notification(3), notification(2)];

        let ids: Vec<u64> = fresh(&seen, &latest).iter().map(|n| n.id).collect();

        assert_eq!(ids, vec![4, 3]);
    }
}
