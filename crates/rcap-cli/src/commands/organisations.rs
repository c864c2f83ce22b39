use super::utils::{empty, field, heading, require_session};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::organisation::{Organisation, OrganisationFilters, OrganisationType};

pub async fn list(
    ctx: &AppContext,
    parent_id: Option<u64>,
    organisation_type: Option<OrganisationType>,
) -> Result<()> {
    require_session(ctx).await?;
    let organisations = ctx
        .organisations
        .fetch_organisations(&OrganisationFilters {
            parent_id,
            organisation_type,
        })
        .await?;

    if organisations.is_empty() {
        empty("organisations");
    }
    for organisation in &organisations {
        print_tree(organisation, 0);
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let organisation = ctx.organisations.fetch_organisation(id).await?;

    heading(&organisation.name);
    field("id", organisation.id);
    field("type", organisation.organisation_type);
    if let Some(parent_id) = organisation.parent_id {
        field("parent", format!("#{}", parent_id));
    }
    if let Some(description) = &organisation.description {
        field("description", description);
    }
    for child in organisation.children.iter().flatten() {
        print_tree(child, 1);
    }
    Ok(())
}

pub async fn users(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let users = ctx.organisations.fetch_organisation_users(id).await?;

    if users.is_empty() {
        empty("users");
    }
    for user in &users {
        println!(
            "{:>6}  {:<11} {} <{}>",
            format!("#{}", user.id).dimmed(),
            user.role,
            user.name,
            user.email
        );
    }
    Ok(())
}

fn print_tree(organisation: &Organisation, depth: usize) {
    println!(
        "{}{} {} {}",
        "  ".repeat(depth),
        format!("#{}", organisation.id).dimmed(),
        organisation.name,
        format!("({})", organisation.organisation_type).dimmed()
    );
    for child in organisation.children.iter().flatten() {
        print_tree(child, depth + 1);
    }
}
