use super::utils::{field, heading, prompt, require_session, success};
use anyhow::Result;
use rcap_application::AppContext;
use rcap_core::session::{Credentials, RegistrationData};
use rcap_core::user::User;

pub async fn login(ctx: &AppContext, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password")?,
    };

    let payload = ctx.auth.login(&Credentials { email, password }).await?;
    success(&format!("Signed in as {} ({})", display_name(&payload.user), payload.user.role));
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    email: String,
    name: String,
    organisation_id: Option<u64>,
) -> Result<()> {
    let password = prompt("Password")?;
    let password_confirmation = prompt("Confirm password")?;

    let payload = ctx
        .auth
        .register(&RegistrationData {
            email,
            password,
            password_confirmation,
            name,
            organisation_id,
        })
        .await?;
    success(&format!("Account created, signed in as {}", display_name(&payload.user)));
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout().await?;
    success("Signed out");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let Some(user) = ctx.auth.user().await else {
        anyhow::bail!("Not signed in. Run `rcap login` first.");
    };

    heading(&display_name(&user));
    field("id", user.id);
    field("email", &user.email);
    field("role", user.role);
    if let Some(organisation) = &user.organisation {
        field("organisation", format!("{} (#{})", organisation.name, organisation.id));
    }
    Ok(())
}

pub async fn refresh(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    ctx.auth.refresh_token().await?;
    success("Session refreshed");
    Ok(())
}

fn display_name(user: &User) -> String {
    if user.name.is_empty() {
        user.email.clone()
    } else {
        user.name.clone()
    }
}
