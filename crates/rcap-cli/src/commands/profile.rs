use super::utils::{field, heading, prompt, require_session, success};
use anyhow::Result;
use rcap_application::AppContext;
use rcap_core::user::{PasswordChange, ProfileUpdate};
use std::path::PathBuf;

pub async fn show(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let user = ctx.users.fetch_profile().await?;

    heading(&user.name);
    field("email", &user.email);
    field("role", user.role);
    if let Some(organisation) = &user.organisation {
        field("organisation", &organisation.name);
    }
    if let Some(picture) = &user.profile_picture {
        field("picture", picture);
    }
    Ok(())
}

pub async fn update(ctx: &AppContext, name: Option<String>, picture: Option<PathBuf>) -> Result<()> {
    let update = ProfileUpdate {
        name,
        profile_picture: picture,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update, pass --name and/or --picture");
    }

    require_session(ctx).await?;
    let user = ctx.users.update_profile(&update).await?;
    success(&format!("Profile updated for {}", user.name));
    Ok(())
}

pub async fn password(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let current_password = prompt("Current password")?;
    let password = prompt("New password")?;
    let password_confirmation = prompt("Confirm new password")?;
    if password != password_confirmation {
        anyhow::bail!("Passwords do not match");
    }

    ctx.users
        .change_password(&PasswordChange {
            current_password,
            password,
            password_confirmation,
        })
        .await?;
    success("Password changed");
    Ok(())
}
