//! Config command - show resolved configuration and search paths.

use std::path::Path;

use tollgate_config::{Config, ShowFormat};

use crate::theme::Theme;

fn parse_format(format: &str) -> anyhow::Result<ShowFormat> {
    match format {
        "toml" => Ok(ShowFormat::Toml),
        "json" => Ok(ShowFormat::Json),
        other => anyhow::bail!("unknown format '{other}'; expected toml or json"),
    }
}

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(
    workspace: Option<&Path>,
    format: &str,
    section: Option<&str>,
) -> anyhow::Result<()> {
    let format = parse_format(format)?;
    let resolved = Config::load(workspace)?;
    let rendered = resolved
        .show(format, section)
        .map_err(|e| anyhow::anyhow!("failed to render configuration: {e}"))?;
    print!("{rendered}");
    Ok(())
}

/// Load and validate the configuration, reporting the result.
pub(crate) fn validate_config(workspace: Option<&Path>) -> anyhow::Result<()> {
    match Config::load(workspace) {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid"));
            for file in &resolved.loaded_files {
                println!("  {}", Theme::dimmed(file));
            }
            Ok(())
        },
        Err(e) => {
            println!("{}", Theme::error(&e.to_string()));
            Err(e.into())
        },
    }
}

/// Show the config file paths that are checked, in merge order.
pub(crate) fn show_paths(workspace: Option<&Path>) -> anyhow::Result<()> {
    let home = tollgate_config::loader::home_directory().ok();
    let home = home.as_deref().and_then(Path::to_str);
    let workspace = workspace.and_then(Path::to_str);

    println!("\n{}", Theme::header("Config Paths"));
    println!("{}", Theme::separator());
    for path in tollgate_config::ResolvedConfig::config_paths(home, workspace) {
        let marker = if Path::new(&path).exists() {
            Theme::success(&path)
        } else {
            Theme::dimmed(&path)
        };
        println!("  {marker}");
    }
    println!();
    Ok(())
}
