//! CLI Adapter.

mod catalog;
mod generate;
mod maintenance;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::app::api::current_home;
use crate::app::config::load_config;
use crate::app::logging::{LoggingGuard, init_logging};
use crate::domain::{AppError, StudioHome};

#[derive(Parser)]
#[command(name = "photo-studio")]
#[command(version)]
#[command(
    about = "Compose scenario prompts and generate photos from reference images",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate images for a scenario from reference photos
    #[clap(visible_alias = "g")]
    Generate(generate::GenerateArgs),
    /// List scenarios with their photo bounds
    #[clap(visible_alias = "ls")]
    Scenarios,
    /// List templates (styles, poses, characters) of a scenario
    Templates {
        /// Scenario id or name
        #[arg(short, long)]
        scenario: String,
    },
    /// List background presets of a scenario
    Backgrounds {
        /// Scenario id or name
        #[arg(short, long)]
        scenario: String,
    },
    /// Append a custom template to a scenario
    AddTemplate {
        /// Scenario id or name
        #[arg(short, long)]
        scenario: String,
        /// Display name of the template
        #[arg(long)]
        name: String,
        /// Template id; derived from the name when omitted
        #[arg(long)]
        id: Option<String>,
        /// Base prompt; may reference parameters as {{ name }}
        #[arg(long)]
        prompt: String,
        /// Parameter with default value (key=value); key= marks it required
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        /// Negative prompt for this template
        #[arg(long)]
        negative_prompt: Option<String>,
    },
    /// Show or edit studio.toml
    #[command(group(ArgGroup::new("action").required(true).args(["show", "set"])))]
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
        /// Set one value (section.key=value)
        #[arg(long)]
        set: Option<String>,
    },
    /// Remove temporary normalized photos
    Cleanup,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let result: Result<i32, AppError> = current_home().and_then(|home| match cli.command {
        Commands::Generate(args) => {
            let _guard = start_logging(&home);
            generate::run_generate(&home, args)
        }
        Commands::Scenarios => catalog::run_scenarios(&home).map(|_| 0),
        Commands::Templates { scenario } => catalog::run_templates(&home, &scenario).map(|_| 0),
        Commands::Backgrounds { scenario } => {
            catalog::run_backgrounds(&home, &scenario).map(|_| 0)
        }
        Commands::AddTemplate { scenario, name, id, prompt, params, negative_prompt } => {
            let _guard = start_logging(&home);
            let options = crate::app::api::AddTemplateOptions {
                scenario,
                name,
                id,
                prompt,
                negative_prompt,
                parameters: params,
            };
            catalog::run_add_template(&home, &options).map(|_| 0)
        }
        Commands::Config { show, set } => maintenance::run_config(&home, show, set).map(|_| 0),
        Commands::Cleanup => {
            let _guard = start_logging(&home);
            maintenance::run_cleanup(&home).map(|_| 0)
        }
    });

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// File logging goes to the configured logs directory; a broken config is
/// reported by the command itself.
fn start_logging(home: &StudioHome) -> Option<LoggingGuard> {
    let config = load_config(home).ok()?;
    let logs: PathBuf = home.dirs(&config.paths).logs;
    init_logging(&logs)
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
