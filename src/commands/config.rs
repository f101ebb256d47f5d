//! Config command handler: show effective configuration.

use anyhow::Result;

use super::RunContext;
use crate::app_config::{LoadedConfig, VerbositySetting};
use crate::cli::ExtractorArgs;

pub fn run_config_show_command(loaded_config: &LoadedConfig, ctx: &RunContext) -> Result<()> {
    for line in render_effective_config(loaded_config, ctx) {
        println!("{line}");
    }
    Ok(())
}

fn render_effective_config(loaded_config: &LoadedConfig, ctx: &RunContext) -> Vec<String> {
    let file_config = loaded_config.file_config();
    let settings = ctx.settings(&ExtractorArgs::default());

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let stopwords_file = file_config
        .stopwords_file
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |path| path.display().to_string());

    vec![
        format!("config_path = {resolved_path}"),
        format!(
            "config_file = {}",
            if loaded_config.loaded_from_file {
                "loaded"
            } else {
                "not found (using defaults)"
            }
        ),
        format!("database = {}", ctx.db_path.display()),
        format!("max_keywords = {}", settings.max_keywords),
        format!("max_pages = {}", settings.max_pages),
        format!("tokenizer = {}", settings.tokenizer),
        format!("stopwords_file = {stopwords_file}"),
        format!("stop_words = {}", ctx.stop_words.len()),
        format!(
            "verbosity = {}",
            file_config
                .verbosity
                .unwrap_or(VerbositySetting::Default)
                .as_str()
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::FileConfig;
    use std::path::PathBuf;

    #[test]
    fn test_render_effective_config_without_file() {
        let loaded = LoadedConfig {
            path: Some(PathBuf::from("/home/reader/.config/bookshelf/config.toml")),
            config: None,
            loaded_from_file: false,
        };
        let ctx = RunContext::resolve(None, &FileConfig::default()).expect("resolve");

        let lines = render_effective_config(&loaded, &ctx);
        assert!(lines.contains(&"config_file = not found (using defaults)".to_string()));
        assert!(lines.contains(&"database = bookshelf.db".to_string()));
        assert!(lines.contains(&"max_keywords = 10".to_string()));
        assert!(lines.contains(&"tokenizer = unicode".to_string()));
        assert!(lines.contains(&"verbosity = default".to_string()));
    }

    #[test]
    fn test_render_effective_config_from_file() {
        let config = FileConfig {
            max_pages: Some(3),
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let loaded = LoadedConfig {
            path: None,
            config: Some(config.clone()),
            loaded_from_file: true,
        };
        let ctx = RunContext::resolve(None, &config).expect("resolve");

        let lines = render_effective_config(&loaded, &ctx);
        assert_eq!(lines[0], "config_path = <unresolved>");
        assert!(lines.contains(&"config_file = loaded".to_string()));
        assert!(lines.contains(&"max_pages = 3".to_string()));
        assert!(lines.contains(&"verbosity = quiet".to_string()));
    }
}
