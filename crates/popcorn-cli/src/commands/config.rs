use super::prompts;
use super::AppContext;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, API_KEY_ENV};
use serde_json::json;

pub async fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::SetApiKey { key } => set_api_key(ctx, key, output),
        ConfigCommands::Path => show_paths(ctx, output),
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
    let key_source = if env_key.is_some() {
        API_KEY_ENV.to_string()
    } else if config.omdb.api_key.is_some() {
        "config file".to_string()
    } else {
        "not set".to_string()
    };
    let key_display = config
        .resolve_api_key()
        .map(|k| if full { k } else { mask_string(&k) })
        .unwrap_or_else(|_| "-".to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if !config_file.exists() {
                output.warn(format!("No configuration file at {}, showing defaults", config_file.display()));
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
                Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
            table.add_row(vec![Cell::new("OMDb API key"), Cell::new(format!("{} ({})", key_display, key_source))]);
            table.add_row(vec![Cell::new("OMDb base URL"), Cell::new(&config.omdb.base_url)]);
            table.add_row(vec![Cell::new("Request timeout"), Cell::new(format!("{}s", config.omdb.timeout_secs))]);
            table.add_row(vec![Cell::new("Minimum query length"), Cell::new(config.search.min_query_len)]);
            table.add_row(vec![
                Cell::new("Watched list"),
                Cell::new(config.watched_file(&ctx.paths).display()),
            ]);
            table.add_row(vec![
                Cell::new("Log file"),
                Cell::new(
                    config
                        .logging
                        .file
                        .as_ref()
                        .map_or_else(|| "stderr".to_string(), |p| p.display().to_string()),
                ),
            ]);
            table.load_preset(presets::UTF8_FULL);
            table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);

            if let Err(e) = config.validate() {
                output.warn(format!("Configuration problem: {}", e));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file,
                "api_key": key_display,
                "api_key_source": key_source,
                "base_url": config.omdb.base_url,
                "timeout_secs": config.omdb.timeout_secs,
                "min_query_len": config.search.min_query_len,
                "watched_file": config.watched_file(&ctx.paths),
                "log_file": config.logging.file,
                "valid": config.validate().is_ok(),
            }));
        }
    }
    Ok(())
}

fn set_api_key(ctx: &AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            output.println(format!(
                "Get a free key at {}",
                "https://www.omdbapi.com/apikey.aspx".bright_blue()
            ));
            prompts::prompt_secret("OMDb API key")?
        }
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create profile directories: {}", e))?;
    let config_file = ctx.paths.config_file();
    // Re-read so settings edited since startup are not clobbered.
    let mut config = Config::load_or_default(&config_file).map_err(|e| eyre!("{}", e))?;
    config.omdb.api_key = Some(key);
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Saved OMDb API key to {}", config_file.display()));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    Ok(())
}

fn show_paths(ctx: &AppContext, output: &Output) -> Result<()> {
    let watched_file = ctx.config.watched_file(&ctx.paths);
    output.json(&json!({
        "config_dir": ctx.paths.config_dir(),
        "data_dir": ctx.paths.data_dir(),
        "log_dir": ctx.paths.log_dir(),
        "default_log_file": ctx.paths.log_file(),
        "config_file": ctx.paths.config_file(),
        "watched_file": watched_file,
    }));
    output.println(format!("Config file:  {}", ctx.paths.config_file().display()));
    output.println(format!("Watched list: {}", watched_file.display()));
    output.println(format!("Log file:     {} (when logging.file is set)", ctx.paths.log_file().display()));
    Ok(())
}

pub fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
