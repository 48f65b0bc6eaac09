//! One-shot document commands against the server.

use std::sync::Arc;

use console::style;

use crate::api::{DocumentApi, DocumentPage, HttpApi};
use crate::config::Settings;
use crate::models::DocumentStatus;

use super::require_user;

/// List documents, optionally scoped to one category.
pub async fn cmd_list(
    settings: &Settings,
    api: Arc<HttpApi>,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let user_id = require_user(settings)?;
    let page = api.list_documents(user_id, category).await?;
    print_page(&page);
    Ok(())
}

/// Search documents by text.
pub async fn cmd_search(settings: &Settings, api: Arc<HttpApi>, query: &str) -> anyhow::Result<()> {
    let user_id = require_user(settings)?;
    let page = api.search_documents(user_id, query).await?;
    if page.records.is_empty() {
        println!("{} No matches for '{}'", style("!").yellow(), query);
        return Ok(());
    }
    print_page(&page);
    Ok(())
}

/// Show categories with document counts.
pub async fn cmd_categories(settings: &Settings, api: Arc<HttpApi>) -> anyhow::Result<()> {
    let user_id = require_user(settings)?;
    let categories = api.list_categories(user_id).await?;
    if categories.is_empty() {
        println!("{} No categories yet", style("!").yellow());
        return Ok(());
    }
    for category in categories {
        println!("{:>5}  {}", category.count, category.name);
    }
    Ok(())
}

/// Change a document's category.
pub async fn cmd_set_category(api: Arc<HttpApi>, id: &str, category: &str) -> anyhow::Result<()> {
    api.set_category(id, category).await?;
    println!(
        "{} Document {} moved to {}",
        style("✓").green(),
        id,
        style(category).cyan()
    );
    Ok(())
}

/// Delete a document.
pub async fn cmd_delete(api: Arc<HttpApi>, id: &str) -> anyhow::Result<()> {
    api.delete_document(id).await?;
    println!("{} Document {} deleted", style("✓").green(), id);
    Ok(())
}

/// Print a page of documents as a simple table.
pub fn print_page(page: &DocumentPage) {
    for record in &page.records {
        let status = match record.status {
            DocumentStatus::Processing => style("processing").yellow(),
            DocumentStatus::Completed => style("completed ").green(),
            DocumentStatus::Failed => style("failed    ").red(),
        };
        println!(
            "{:>8}  {}  {:<12}  {}  {}",
            record.id,
            record.date.format("%Y-%m-%d"),
            record.category,
            status,
            record.title
        );
        if let Some(preview) = &record.preview {
            println!("          {}", style(preview).dim());
        }
    }
    println!(
        "{}",
        style(format!("{} document(s)", page.count)).dim()
    );
}
