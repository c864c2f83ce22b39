use super::utils::{empty, field, heading, require_session};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::analytics::{AnalyticsFilters, DateRange, HeatmapFilters};

const BAR_WIDTH: u64 = 40;

pub async fn status(
    ctx: &AppContext,
    organisation_id: Option<u64>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    require_session(ctx).await?;
    let breakdown = ctx
        .analytics
        .fetch_status_breakdown(&AnalyticsFilters {
            organisation_id,
            start_date: from,
            end_date: to,
        })
        .await?;

    heading("Activities by status");
    field("draft", breakdown.draft);
    field("submitted", breakdown.submitted);
    field("approved", breakdown.approved);
    field("rejected", breakdown.rejected);
    field("total", breakdown.total());
    Ok(())
}

pub async fn heatmap(
    ctx: &AppContext,
    from: String,
    to: String,
    organisation_id: Option<u64>,
    activity_type: Option<String>,
) -> Result<()> {
    require_session(ctx).await?;
    let heatmap = ctx
        .analytics
        .fetch_heatmap(&HeatmapFilters {
            start_date: from,
            end_date: to,
            organisation_id,
            activity_type,
        })
        .await?;

    if heatmap.is_empty() {
        empty("activity");
        return Ok(());
    }
    let peak = heatmap.values().copied().max().unwrap_or(0);
    for (date, count) in &heatmap {
        println!("  {}  {:>4} {}", date, count, bar(*count, peak).green());
    }
    Ok(())
}

pub async fn engagement(
    ctx: &AppContext,
    organisation_id: Option<u64>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    require_session(ctx).await?;
    let report = ctx
        .analytics
        .fetch_engagement_metrics(&AnalyticsFilters {
            organisation_id,
            start_date: from,
            end_date: to,
        })
        .await?;

    if report.metrics.is_empty() {
        empty("engagement metrics");
    }
    for metric in &report.metrics {
        println!(
            "  {}  {:>6}  {:<16} {}{}",
            metric.recorded_at.format("%Y-%m-%d"),
            format!("#{}", metric.activity_id).dimmed(),
            metric.metric_type,
            metric.value,
            metric.unit.as_deref().map(|unit| format!(" {}", unit)).unwrap_or_default()
        );
    }
    Ok(())
}

pub async fn trends(ctx: &AppContext, from: String, to: String) -> Result<()> {
    require_session(ctx).await?;
    let trends = ctx
        .analytics
        .fetch_engagement_trends(&DateRange {
            start_date: from,
            end_date: to,
        })
        .await?;

    if trends.is_empty() {
        empty("trends");
    }
    for trend in &trends {
        println!(
            "  {}  avg {:>8.2}  total {:>8.2}",
            trend.date, trend.average, trend.total
        );
    }
    Ok(())
}

/// Horizontal bar scaled so `peak` fills the full width.
fn bar(count: u64, peak: u64) -> String {
    if peak == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(peak);
    "█".repeat(width as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_peak() {
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH as usize);
        assert_eq!(bar(1, 40).chars().count(), 1);
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(0, 0), "");
    }
}
