//! Generate command implementation.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Args;
use dialoguer::Select;

use crate::adapters::dialoguer_review_prompter::DialoguerReviewPrompter;
use crate::app::api::{self, GenerateOptions, GenerateOutcome, ReviewStatus};
use crate::domain::prompt::{BACKGROUND_KEY, NEGATIVE_PROMPT_KEY};
use crate::domain::{AppError, Overrides, StudioHome};
use crate::ports::ReviewPrompter;

/// Exit code when at least one requested image is missing.
const EXIT_PARTIAL: i32 = 2;
/// Parameter carrying the caller's own prompt in free mode.
const PROMPT_KEY: &str = "prompt";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Scenario id or name; asked interactively when omitted
    #[arg(short, long)]
    pub scenario: Option<String>,
    /// Reference photo, in person order (repeatable, comma separated lists accepted)
    #[arg(short = 'p', long = "photo", value_delimiter = ',')]
    pub photos: Vec<PathBuf>,
    /// Template id or name (repeatable; cycled across outputs)
    #[arg(short = 't', long = "template", visible_aliases = ["style", "pose", "character"])]
    pub templates: Vec<String>,
    /// Background preset name or free text
    #[arg(short, long)]
    pub background: Option<String>,
    /// Parameter override (key=value, repeatable)
    #[arg(long = "param", value_parser = super::parse_key_value)]
    pub params: Vec<(String, String)>,
    /// Prompt text for free mode
    #[arg(long)]
    pub prompt: Option<String>,
    /// Replace the negative prompt
    #[arg(long)]
    pub negative_prompt: Option<String>,
    /// Number of images to generate
    #[arg(short, long)]
    pub count: Option<u32>,
    /// Maximum simultaneous requests
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Use the local mock image client
    #[arg(long)]
    pub mock: bool,
    /// Keep results as generated, without the review step
    #[arg(short = 'n', long, visible_alias = "skip-review")]
    pub non_interactive: bool,
    /// Print composed prompts and exit without generating
    #[arg(long)]
    pub prompt_preview: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> Overrides {
        let mut overrides: Overrides = self.params.iter().cloned().collect();
        if let Some(background) = &self.background {
            overrides.insert(BACKGROUND_KEY.to_string(), background.clone());
        }
        if let Some(prompt) = &self.prompt {
            overrides.insert(PROMPT_KEY.to_string(), prompt.clone());
        }
        if let Some(negative) = &self.negative_prompt {
            overrides.insert(NEGATIVE_PROMPT_KEY.to_string(), negative.clone());
        }
        overrides
    }
}

pub fn run_generate(home: &StudioHome, args: GenerateArgs) -> Result<i32, AppError> {
    let interactive = !args.non_interactive && std::io::stdin().is_terminal();
    let scenario = match &args.scenario {
        Some(value) => value.clone(),
        None if interactive => match prompt_scenario(home)? {
            Some(value) => value,
            None => return Err(AppError::Cancelled),
        },
        None => {
            return Err(AppError::InvalidArgument(
                "--scenario is required in non-interactive mode".into(),
            ));
        }
    };

    let options = GenerateOptions {
        scenario,
        photos: args.photos.clone(),
        templates: args.templates.clone(),
        overrides: args.overrides(),
        count: args.count,
        concurrency: args.concurrency,
        mock: args.mock,
        non_interactive: !interactive,
        prompt_preview: args.prompt_preview,
    };

    if options.prompt_preview {
        let outcome = api::compose_prompts_at(home, &options)?;
        print_prompts(&outcome);
        return Ok(0);
    }

    let mut prompter = DialoguerReviewPrompter::new();
    let reviewer: Option<&mut dyn ReviewPrompter> =
        if interactive { Some(&mut prompter) } else { None };
    let outcome = api::generate_at(home, &options, reviewer)?;
    print_results(&outcome);

    let summary = outcome.summary();
    Ok(match outcome.review {
        ReviewStatus::Confirmed => 0,
        _ if summary.is_complete() => 0,
        _ => EXIT_PARTIAL,
    })
}

fn prompt_scenario(home: &StudioHome) -> Result<Option<String>, AppError> {
    let scenarios = api::list_scenarios_at(home)?;
    let items: Vec<String> = scenarios
        .iter()
        .map(|s| format!("{} ({}, {} photo(s))", s.name, s.id, s.photos))
        .collect();
    let selection = Select::new()
        .with_prompt("Select scenario")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::InvalidArgument(format!("Failed to select scenario: {}", err)))?;
    Ok(selection.map(|index| scenarios[index].id.clone()))
}

fn print_prompts(outcome: &GenerateOutcome) {
    println!("📝 {} ({})", outcome.scenario.name, outcome.scenario.id);
    for prompt in &outcome.prompts {
        println!();
        println!("[{}] {}", prompt.template_id, prompt.template_name);
        println!("Prompt: {}", prompt.prompt);
        println!("Negative prompt: {}", prompt.negative_prompt);
    }
}

fn print_results(outcome: &GenerateOutcome) {
    for (position, result) in outcome.results.iter().enumerate() {
        match (result.path(), result.failure_reason()) {
            (Some(path), _) => println!("✅ {}. {}", position + 1, path.display()),
            (None, Some(reason)) => {
                println!("❌ {}. image {} failed: {}", position + 1, result.index + 1, reason)
            }
            (None, None) => {}
        }
    }
    let summary = outcome.summary();
    match outcome.review {
        ReviewStatus::Cancelled => println!("⚠️  Review cancelled; files are kept as generated"),
        ReviewStatus::Confirmed => println!("✅ Review confirmed"),
        ReviewStatus::Skipped => {}
    }
    println!(
        "Generated {}/{} images in {}",
        summary.succeeded,
        summary.requested,
        outcome.output_dir.display()
    );
}
