use super::utils::{empty, field, heading, require_session};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;

pub async fn list(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let templates = ctx.templates.fetch_templates().await?;

    if templates.is_empty() {
        empty("templates");
    }
    for template in &templates {
        println!(
            "{:>6}  {}  {}",
            format!("#{}", template.id).dimmed(),
            template.name,
            template.description.as_deref().unwrap_or_default().dimmed()
        );
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let template = ctx.templates.fetch_template(id).await?;

    heading(&template.name);
    if let Some(description) = &template.description {
        field("description", description);
    }
    field(
        "required",
        format!("{} of {} fields", template.required_fields().count(), template.fields.len()),
    );
    for template_field in &template.fields {
        let required = if template_field.required { "*".red() } else { " ".normal() };
        let options = template_field
            .options
            .as_ref()
            .map(|options| format!(" [{}]", options.join(" | ")))
            .unwrap_or_default();
        println!(
            "  {} {:<20} {}{}",
            required,
            template_field.name,
            template_field.field_type.dimmed(),
            options
        );
    }
    Ok(())
}
