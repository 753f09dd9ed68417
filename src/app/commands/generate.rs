//! Generate command: validate, compose, preprocess, dispatch, review.

use std::path::PathBuf;

use tracing::info;

use crate::adapters::catalogs::read_layout_asset;
use crate::app::AppContext;
use crate::app::services::{
    GenerationPipeline, PhotoPreprocessor, QualityGate, ReviewOutcome, run_review,
};
use crate::domain::{
    AppError, ComposedPrompt, GenerationRequest, GenerationResult, GenerationSummary, Overrides,
    PromptComposer, Scenario,
};
use crate::ports::{ImageClient, ReviewPrompter, TemplateStore};

/// Options for a generate invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Scenario id or display name.
    pub scenario: String,
    /// Reference photos in person order.
    pub photos: Vec<PathBuf>,
    /// Template ids or names; empty selects the scenario default.
    pub templates: Vec<String>,
    /// Parameter overrides, including `background` and `negative_prompt`.
    pub overrides: Overrides,
    pub count: Option<u32>,
    pub concurrency: Option<usize>,
    pub mock: bool,
    /// Accept results as-is without the review loop.
    pub non_interactive: bool,
    /// Compose and return prompts without generating anything.
    pub prompt_preview: bool,
}

/// How the review step concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Skipped,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub scenario: Scenario,
    pub prompts: Vec<ComposedPrompt>,
    /// Final results in display order; empty for a prompt preview.
    pub results: Vec<GenerationResult>,
    pub review: ReviewStatus,
    pub output_dir: PathBuf,
}

impl GenerateOutcome {
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary::from_results(&self.results)
    }
}

/// Validated inputs shared by preview and generation.
struct GenerationPlan {
    scenario: Scenario,
    prompts: Vec<ComposedPrompt>,
    count: usize,
}

fn plan<S: TemplateStore>(
    ctx: &AppContext<S>,
    options: &GenerateOptions,
) -> Result<GenerationPlan, AppError> {
    let catalog = ctx.templates().load_catalog()?;
    let entry = catalog.entry(&options.scenario)?;
    let scenario = entry.scenario.clone();
    let settings = &ctx.config().generation;

    let count = options
        .count
        .unwrap_or_else(|| settings.default_count.max(options.templates.len() as u32));
    if count == 0 || count > settings.max_count {
        return Err(AppError::InvalidOutputCount { max: settings.max_count, actual: count });
    }

    scenario.photos.check(&scenario.id, options.photos.len())?;

    let template_keys: Vec<&str> = if options.templates.is_empty() {
        vec![entry.default_template()?.id.as_str()]
    } else {
        options.templates.iter().map(String::as_str).collect()
    };
    let composer = PromptComposer::new(&catalog, read_layout_asset);
    let prompts = template_keys
        .into_iter()
        .map(|key| composer.compose(&scenario.id, key, &options.overrides, options.photos.len()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationPlan { scenario, prompts, count: count as usize })
}

fn file_stem(scenario: &Scenario, prompts: &[ComposedPrompt]) -> String {
    match prompts {
        [single] => format!("{}_{}", scenario.id, single.template_id),
        _ => scenario.id.clone(),
    }
}

/// Execute the generate command with the client selected by the context.
pub fn execute<S: TemplateStore>(
    ctx: &AppContext<S>,
    options: &GenerateOptions,
    reviewer: Option<&mut dyn ReviewPrompter>,
) -> Result<GenerateOutcome, AppError> {
    let plan = plan(ctx, options)?;
    if options.prompt_preview {
        return Ok(GenerateOutcome {
            scenario: plan.scenario,
            prompts: plan.prompts,
            results: Vec::new(),
            review: ReviewStatus::Skipped,
            output_dir: ctx.dirs().output,
        });
    }
    let client = ctx.image_client(options.mock)?;
    run(ctx, options, plan, client.as_ref(), reviewer)
}

/// Execute the generate command against an explicit image client.
pub fn execute_with_client<S: TemplateStore>(
    ctx: &AppContext<S>,
    options: &GenerateOptions,
    client: &dyn ImageClient,
    reviewer: Option<&mut dyn ReviewPrompter>,
) -> Result<GenerateOutcome, AppError> {
    let plan = plan(ctx, options)?;
    run(ctx, options, plan, client, reviewer)
}

fn run<S: TemplateStore>(
    ctx: &AppContext<S>,
    options: &GenerateOptions,
    plan: GenerationPlan,
    client: &dyn ImageClient,
    reviewer: Option<&mut dyn ReviewPrompter>,
) -> Result<GenerateOutcome, AppError> {
    let settings = &ctx.config().generation;
    let dirs = ctx.dirs();

    let preprocessor = PhotoPreprocessor::new(&dirs.temp, settings.max_photo_dimension);
    let references = preprocessor.prepare(&plan.scenario.id, plan.scenario.photos, &options.photos)?;

    let request = GenerationRequest::new(
        references,
        plan.prompts.clone(),
        plan.count,
        settings.dimensions(),
        settings.model.clone(),
        file_stem(&plan.scenario, &plan.prompts),
    )?;
    let concurrency = options.concurrency.unwrap_or(settings.concurrency).max(1);
    let mut pipeline = GenerationPipeline::new(client, &dirs.output, concurrency);
    if !client.produces_placeholders() {
        pipeline = pipeline.with_quality_gate(QualityGate::from_settings(settings));
    }
    info!(
        scenario = %plan.scenario.id,
        count = plan.count,
        concurrency,
        run_id = %pipeline.run_id(),
        "starting generation"
    );
    let results = pipeline.generate(&request)?;

    let (results, review) = match reviewer {
        Some(reviewer) if !options.non_interactive => {
            let outcome = run_review(results, reviewer, |index, attempt| {
                pipeline.regenerate(&request, index, attempt)
            })?;
            match outcome {
                ReviewOutcome::Confirmed(results) => (results, ReviewStatus::Confirmed),
                ReviewOutcome::Cancelled(results) => (results, ReviewStatus::Cancelled),
            }
        }
        _ => (results, ReviewStatus::Skipped),
    };

    let summary = GenerationSummary::from_results(&results);
    info!(succeeded = summary.succeeded, requested = summary.requested, "generation finished");

    Ok(GenerateOutcome {
        scenario: plan.scenario,
        prompts: plan.prompts,
        results,
        review,
        output_dir: dirs.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embedded_template_store::EmbeddedTemplateStore;
    use crate::domain::{
        Credentials, GenerationFailure, ReviewAction, ReviewDecision, StudioConfig, StudioHome,
    };
    use crate::ports::ReviewCommand;
    use crate::testing::{ScriptedImageClient, ScriptedReviewer, write_test_photo};
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> AppContext<EmbeddedTemplateStore> {
        let home = StudioHome::new(dir.path());
        let mut config = StudioConfig::default();
        config.generation.width = 64;
        config.generation.height = 64;
        let templates = EmbeddedTemplateStore::new(home.custom_templates_file());
        AppContext::new(home, config, Credentials::new(None), templates)
    }

    fn photo(dir: &TempDir, name: &str) -> PathBuf {
        write_test_photo(&dir.path().join("in").join(name), 32, 32, [120, 90, 60])
    }

    #[test]
    fn portrait_style_generates_three_distinct_files() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let client = ScriptedImageClient::new();
        let options = GenerateOptions {
            scenario: "portrait".into(),
            photos: vec![photo(&dir, "me.jpg")],
            templates: vec!["职业商务照".into()],
            count: Some(3),
            non_interactive: true,
            ..Default::default()
        };

        let outcome = execute_with_client(&ctx, &options, &client, None).unwrap();
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.summary().is_complete());
        let mut paths: Vec<_> = outcome.results.iter().map(|r| r.path().unwrap().to_path_buf()).collect();
        paths.dedup();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists() && p.starts_with(dir.path().join("output/images"))));
        assert!(client.calls()[0].prompt.contains("corporate headshot"));
    }

    #[test]
    fn too_many_photos_fail_before_any_call() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let client = ScriptedImageClient::new();
        let photos = (0..7).map(|i| photo(&dir, &format!("p{}.jpg", i))).collect();
        let options = GenerateOptions {
            scenario: "family".into(),
            photos,
            non_interactive: true,
            ..Default::default()
        };

        let err = execute_with_client(&ctx, &options, &client, None).unwrap_err();
        assert!(matches!(err, AppError::PhotoCountOutOfRange { max: 6, actual: 7, .. }));
        assert!(client.calls().is_empty());
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn missing_credential_is_fatal_without_mock() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let options = GenerateOptions {
            scenario: "portrait".into(),
            photos: vec![photo(&dir, "me.jpg")],
            non_interactive: true,
            ..Default::default()
        };
        assert!(matches!(
            execute(&ctx, &options, None),
            Err(AppError::MissingCredential(_))
        ));

        let mock = GenerateOptions { mock: true, ..options };
        let outcome = execute(&ctx, &mock, None).unwrap();
        assert!(outcome.summary().is_complete());
    }

    #[test]
    fn count_bounds_are_enforced() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let options = GenerateOptions {
            scenario: "portrait".into(),
            photos: vec![photo(&dir, "me.jpg")],
            count: Some(11),
            prompt_preview: true,
            ..Default::default()
        };
        assert!(matches!(
            execute(&ctx, &options, None),
            Err(AppError::InvalidOutputCount { max: 10, actual: 11 })
        ));
    }

    #[test]
    fn several_templates_raise_default_count_and_cycle() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let options = GenerateOptions {
            scenario: "celebrity".into(),
            photos: vec![photo(&dir, "fan.jpg")],
            templates: vec!["thor".into(), "Iron Man".into()],
            prompt_preview: true,
            ..Default::default()
        };
        let outcome = execute(&ctx, &options, None).unwrap();
        assert_eq!(outcome.prompts.len(), 2);
        assert!(outcome.prompts[1].prompt.contains("taking a photo with Iron Man"));
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn review_regenerates_failed_slot_in_place() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let client =
            ScriptedImageClient::new().fail_once(1, GenerationFailure::RateLimited("busy".into()));
        let options = GenerateOptions {
            scenario: "portrait".into(),
            photos: vec![photo(&dir, "me.jpg")],
            count: Some(2),
            ..Default::default()
        };
        let mut reviewer = ScriptedReviewer::new([
            ReviewCommand::Decide(ReviewDecision { target_index: 0, action: ReviewAction::Accept }),
            ReviewCommand::Decide(ReviewDecision { target_index: 1, action: ReviewAction::Regenerate }),
            ReviewCommand::Decide(ReviewDecision { target_index: 1, action: ReviewAction::Reorder(0) }),
            ReviewCommand::Confirm,
        ]);

        let outcome = execute_with_client(&ctx, &options, &client, Some(&mut reviewer)).unwrap();
        assert_eq!(outcome.review, ReviewStatus::Confirmed);
        assert!(reviewer.notices.is_empty());
        let indices: Vec<_> = outcome.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, [1, 0]);
        assert!(outcome.results.iter().all(|r| r.is_success()));

        let replacement = outcome.results[0].path().unwrap();
        let name = replacement.file_name().unwrap().to_string_lossy();
        assert!(name.ends_with("_002_r1.jpg"), "unexpected name {}", name);
        assert!(replacement.exists());
        assert_eq!(client.calls().len(), 3);
        assert_eq!(std::fs::read_dir(&outcome.output_dir).unwrap().count(), 2);
    }

    #[test]
    fn api_images_must_pass_the_quality_gate() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let client = ScriptedImageClient::new().as_remote();
        let options = GenerateOptions {
            scenario: "portrait".into(),
            photos: vec![photo(&dir, "me.jpg")],
            count: Some(2),
            non_interactive: true,
            ..Default::default()
        };

        let outcome = execute_with_client(&ctx, &options, &client, None).unwrap();
        assert_eq!(outcome.summary().succeeded, 0);
        assert!(outcome.results.iter().all(|r| matches!(
            r.failure_reason(),
            Some(GenerationFailure::QualityCheck(m)) if m.contains("4x4")
        )));

        let placeholders = ScriptedImageClient::new();
        let outcome = execute_with_client(&ctx, &options, &placeholders, None).unwrap();
        assert_eq!(outcome.summary().succeeded, 2);
    }
}
