use super::utils::{empty, require_session, success};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::onboarding::OnboardingProgress;

pub async fn steps(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let mut steps = ctx.onboarding.fetch_steps().await?;
    let progress = ctx.onboarding.fetch_progress().await?;
    steps.sort_by_key(|step| step.order);

    if steps.is_empty() {
        empty("onboarding steps");
    }
    for step in steps.iter().filter(|step| step.is_active) {
        let marker = if progress.completed_steps.contains(&step.id) {
            "✓".green()
        } else if progress.skipped_steps.contains(&step.id) {
            "-".yellow()
        } else {
            "·".dimmed()
        };
        println!("  {} {:>3}. {}", marker, step.id, step.title);
    }
    Ok(())
}

pub async fn progress(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let progress = ctx.onboarding.fetch_progress().await?;
    print_progress(&progress);
    Ok(())
}

pub async fn complete(ctx: &AppContext, step_id: u64, skip: bool) -> Result<()> {
    require_session(ctx).await?;
    ctx.onboarding.fetch_progress().await?;
    ctx.onboarding.complete_step(step_id, skip).await?;

    let verb = if skip { "Skipped" } else { "Completed" };
    success(&format!("{} step {}", verb, step_id));
    if let Some(progress) = ctx.onboarding.progress().await {
        print_progress(&progress);
    }
    Ok(())
}

pub async fn reset(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let progress = ctx.onboarding.reset_progress().await?;
    success("Onboarding progress reset");
    print_progress(&progress);
    Ok(())
}

fn print_progress(progress: &OnboardingProgress) {
    println!(
        "  {:.0}% ({} of {} steps, {} skipped)",
        progress.progress_percentage,
        progress.completed_steps.len(),
        progress.total_steps,
        progress.skipped_steps.len()
    );
}
