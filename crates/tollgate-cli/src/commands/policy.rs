//! Policy command - inspect and edit remembered choices.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tollgate_policy::{PolicyEntry, PolicyStore};

use crate::theme::Theme;

async fn open(path: &Path) -> anyhow::Result<PolicyStore> {
    PolicyStore::open(path)
        .await
        .with_context(|| format!("failed to open policy file {}", path.display()))
}

/// List every remembered choice.
pub(crate) async fn list_policies(path: &Path) -> anyhow::Result<()> {
    let store = open(path).await?;
    let entries = store.entries();

    if entries.is_empty() {
        println!("{}", Theme::info("No remembered choices"));
        return Ok(());
    }

    println!("\n{}", Theme::header("Tool Policies"));
    println!("{:<32} {}", "TOOL".dimmed(), "POLICY".dimmed());
    println!("{}", Theme::separator());
    for (tool, entry) in entries {
        println!("{tool:<32} {}", Theme::policy(entry));
    }
    println!("\n{}", Theme::dimmed(&format!("from {}", path.display())));
    Ok(())
}

/// Set the policy for one tool.
pub(crate) async fn set_policy(path: &Path, tool: &str, policy: &str) -> anyhow::Result<()> {
    let entry: PolicyEntry = policy.parse().map_err(anyhow::Error::msg)?;
    let store = open(path).await?;
    store.record(tool, entry, true).await?;
    println!(
        "{}",
        Theme::success(&format!("{tool} set to {}", Theme::policy(entry)))
    );
    Ok(())
}

/// Remove the remembered choice for one tool.
pub(crate) async fn forget_policy(path: &Path, tool: &str) -> anyhow::Result<()> {
    let store = open(path).await?;
    match store.forget(tool).await? {
        Some(previous) => println!(
            "{}",
            Theme::success(&format!("forgot {tool} (was {})", Theme::policy(previous)))
        ),
        None => println!(
            "{}",
            Theme::warning(&format!("no remembered choice for {tool}"))
        ),
    }
    Ok(())
}

/// Remove every remembered choice.
pub(crate) async fn reset_policies(path: &Path) -> anyhow::Result<()> {
    let store = open(path).await?;
    let count = store.len();
    store.reset().await?;
    println!(
        "{}",
        Theme::success(&format!("cleared {count} remembered choices"))
    );
    Ok(())
}
