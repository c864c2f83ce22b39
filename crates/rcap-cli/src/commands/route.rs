use super::utils::field;
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;
use rcap_core::guard::GuardDecision;

/// Resolves `path` and reports what the navigation guards decide for the
/// current session. Works signed out too.
pub async fn check(ctx: &AppContext, path: &str) -> Result<()> {
    ctx.auth.restore().await;
    let (resolved, decision) = ctx.check_route(path).await;

    println!("{} {}", path.bold(), format!("→ {}", resolved.name()).dimmed());
    for (name, value) in &resolved.params {
        field(name, value);
    }

    match decision {
        GuardDecision::Allow => println!("{}", "allowed".green()),
        GuardDecision::Redirect(redirect) => {
            let target = ctx.routes.path_for(&redirect.name).unwrap_or(&redirect.name);
            let query: Vec<String> = redirect
                .query
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            if query.is_empty() {
                println!("{} {}", "redirect to".yellow(), target);
            } else {
                println!("{} {}?{}", "redirect to".yellow(), target, query.join("&"));
            }
        }
    }
    Ok(())
}
