use super::utils::{empty, field, heading, require_session};
use anyhow::Result;
use colored::Colorize;
use rcap_application::AppContext;

pub async fn search(ctx: &AppContext, query: String, category: Option<String>) -> Result<()> {
    require_session(ctx).await?;
    let articles = ctx
        .help
        .search_articles(&query, category.as_deref())
        .await?;

    if articles.is_empty() {
        empty("matching articles");
    }
    for article in &articles {
        println!(
            "{:>6}  {}  {}",
            format!("#{}", article.id).dimmed(),
            article.title,
            format!("({})", article.category).dimmed()
        );
        if let Some(excerpt) = &article.excerpt {
            println!("        {}", excerpt.dimmed());
        }
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: u64) -> Result<()> {
    require_session(ctx).await?;
    let article = ctx.help.fetch_article(id).await?;

    heading(&article.title);
    field("category", &article.category);
    field("slug", &article.slug);
    println!();
    println!("{}", article.content);
    Ok(())
}

pub async fn categories(ctx: &AppContext) -> Result<()> {
    require_session(ctx).await?;
    let categories = ctx.help.fetch_categories().await;

    if categories.is_empty() {
        empty("categories");
    }
    for category in &categories {
        println!("  {:<24} {}", category.name, category.count.to_string().dimmed());
    }
    Ok(())
}
