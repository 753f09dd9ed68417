//! Bounded parallel dispatch of generation tasks.
//!
//! A fixed pool of scoped worker threads drains a shared task queue. Results
//! come back over a channel and are placed by request index, so the caller
//! always receives exactly one result per requested output.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, mpsc};
use std::thread;

use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use tracing::{error, info, warn};

use super::quality_gate::QualityGate;
use crate::adapters::persist::write_new;
use crate::domain::{AppError, GenerationFailure, GenerationRequest, GenerationResult};
use crate::ports::{ImageCall, ImageClient};

/// Spacing between per-index seeds.
const SEED_STRIDE: u64 = 7919;
/// Spacing between regeneration attempts of one index.
const ATTEMPT_STRIDE: u64 = 104_729;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    index: usize,
    attempt: u32,
}

pub struct GenerationPipeline<'a> {
    client: &'a dyn ImageClient,
    output_dir: PathBuf,
    concurrency: usize,
    run_id: String,
    base_seed: u64,
    quality: Option<QualityGate>,
}

impl<'a> GenerationPipeline<'a> {
    pub fn new(client: &'a dyn ImageClient, output_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        let now = chrono::Local::now();
        Self {
            client,
            output_dir: output_dir.into(),
            concurrency: concurrency.max(1),
            run_id: now.format("%Y%m%d_%H%M%S_%3f").to_string(),
            base_seed: now.timestamp_millis().unsigned_abs(),
            quality: None,
        }
    }

    /// Reject decoded images that fail `gate` instead of saving them.
    pub fn with_quality_gate(mut self, gate: QualityGate) -> Self {
        self.quality = Some(gate);
        self
    }

    /// Fix the run id and seed, e.g. to make output names predictable.
    pub fn with_run_id(mut self, run_id: impl Into<String>, base_seed: u64) -> Self {
        self.run_id = run_id.into();
        self.base_seed = base_seed;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate every requested output; results are ordered by index.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Vec<GenerationResult>, AppError> {
        let references = self.prepare(request)?;
        let tasks = (0..request.output_count()).map(|index| Task { index, attempt: 0 }).collect();
        Ok(self.dispatch(request, &references, tasks))
    }

    /// Produce a replacement for one output slot.
    pub fn regenerate(
        &self,
        request: &GenerationRequest,
        index: usize,
        attempt: u32,
    ) -> Result<GenerationResult, AppError> {
        if index >= request.output_count() {
            return Err(AppError::InvalidArgument(format!(
                "image {} does not exist (1-{})",
                index + 1,
                request.output_count()
            )));
        }
        let references = self.prepare(request)?;
        let mut results = self.dispatch(request, &references, vec![Task { index, attempt }]);
        Ok(results.pop().unwrap_or_else(|| {
            GenerationResult::failure(index, GenerationFailure::Aborted("no result produced".into()))
        }))
    }

    fn prepare(&self, request: &GenerationRequest) -> Result<Vec<String>, AppError> {
        fs::create_dir_all(&self.output_dir)?;
        request.reference_photos().iter().map(|path| encode_reference(path)).collect()
    }

    fn dispatch(
        &self,
        request: &GenerationRequest,
        references: &[String],
        tasks: Vec<Task>,
    ) -> Vec<GenerationResult> {
        let workers = self.concurrency.min(tasks.len()).max(1);
        info!(tasks = tasks.len(), workers, run_id = %self.run_id, "dispatching generation tasks");

        let (task_tx, task_rx) = mpsc::channel::<Task>();
        for task in &tasks {
            // The receiver is alive until the end of this function.
            let _ = task_tx.send(*task);
        }
        drop(task_tx);
        let task_rx = Mutex::new(task_rx);
        let (result_tx, result_rx) = mpsc::channel::<GenerationResult>();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let result_tx = result_tx.clone();
                    let task_rx = &task_rx;
                    scope.spawn(move || {
                        loop {
                            let next = match task_rx.lock() {
                                Ok(rx) => rx.recv(),
                                Err(_) => break,
                            };
                            let Ok(task) = next else { break };
                            let result = self.run_task(request, references, task);
                            if result_tx.send(result).is_err() {
                                break;
                            }
                        }
                        tracing::debug!(worker, "generation worker finished");
                    })
                })
                .collect();
            for handle in handles {
                if handle.join().is_err() {
                    error!("generation worker panicked");
                }
            }
        });
        drop(result_tx);

        let mut collected: BTreeMap<usize, GenerationResult> =
            result_rx.into_iter().map(|result| (result.index, result)).collect();
        tasks
            .into_iter()
            .map(|task| {
                collected.remove(&task.index).unwrap_or_else(|| {
                    GenerationResult::failure(
                        task.index,
                        GenerationFailure::Aborted("worker stopped before finishing".into()),
                    )
                })
            })
            .collect()
    }

    fn run_task(&self, request: &GenerationRequest, references: &[String], task: Task) -> GenerationResult {
        let prompt = request.prompt_for(task.index);
        let call = ImageCall {
            index: task.index,
            model: request.model(),
            prompt: &prompt.prompt,
            negative_prompt: &prompt.negative_prompt,
            reference_images: references,
            size: request.dimensions(),
            seed: self
                .base_seed
                .wrapping_add(task.index as u64 * SEED_STRIDE)
                .wrapping_add(u64::from(task.attempt) * ATTEMPT_STRIDE),
        };
        info!(index = task.index, attempt = task.attempt, template = %prompt.template_id, "generating image");

        let outcome = self
            .client
            .generate(&call)
            .and_then(|image| self.persist(request, task, &image.bytes));
        match outcome {
            Ok(path) => {
                info!(index = task.index, path = %path.display(), "image saved");
                GenerationResult::success(task.index, path)
            }
            Err(reason) => {
                warn!(index = task.index, reason = %reason, "image generation failed");
                GenerationResult::failure(task.index, reason)
            }
        }
    }

    fn persist(&self, request: &GenerationRequest, task: Task, bytes: &[u8]) -> Result<PathBuf, GenerationFailure> {
        let format = image::guess_format(bytes)
            .map_err(|e| GenerationFailure::MalformedResponse(format!("unrecognized image data: {}", e)))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| GenerationFailure::MalformedResponse(format!("undecodable image: {}", e)))?;
        if let Some(gate) = &self.quality {
            gate.check(&decoded)?;
        }

        let extension = match format {
            ImageFormat::Jpeg => "jpg",
            other => other.extensions_str().first().copied().unwrap_or("img"),
        };
        let suffix = if task.attempt == 0 { String::new() } else { format!("_r{}", task.attempt) };
        let name = format!(
            "{}_{}_{:03}{}.{}",
            request.file_stem(),
            self.run_id,
            task.index + 1,
            suffix,
            extension
        );
        write_new(&self.output_dir.join(name), bytes)
            .map_err(|e| GenerationFailure::Persist(e.to_string()))
    }
}

/// Encode a normalized reference photo as a `data:` URL.
fn encode_reference(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::InvalidPhoto { path: path.to_path_buf(), reason: e.to_string() })?;
    let mime = image::guess_format(&bytes).map(|f| f.to_mime_type()).unwrap_or("image/jpeg");
    Ok(format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComposedPrompt, Dimensions};
    use crate::testing::{ScriptedImageClient, write_test_photo};
    use std::time::Duration;
    use tempfile::TempDir;

    fn prompt(id: &str) -> ComposedPrompt {
        ComposedPrompt {
            template_id: id.into(),
            template_name: id.into(),
            prompt: format!("prompt for {}", id),
            negative_prompt: "blurry".into(),
        }
    }

    fn request(references: Vec<PathBuf>, count: usize) -> GenerationRequest {
        GenerationRequest::new(
            references,
            vec![prompt("a"), prompt("b")],
            count,
            Dimensions { width: 16, height: 16 },
            "model",
            "portrait",
        )
        .unwrap()
    }

    #[test]
    fn returns_one_result_per_index_in_order() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new().with_delay(Duration::from_millis(5));
        let pipeline = GenerationPipeline::new(&client, dir.path(), 3).with_run_id("run", 1);

        let results = pipeline.generate(&request(vec![], 5)).unwrap();
        let indices: Vec<_> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(results[2].path().unwrap(), dir.path().join("portrait_run_003.jpg"));
        assert!(client.peak_concurrency() <= 3);
    }

    #[test]
    fn failures_are_isolated_per_slot() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new()
            .fail_with(1, GenerationFailure::RateLimited("busy".into()))
            .fail_with(3, GenerationFailure::Timeout);
        let pipeline = GenerationPipeline::new(&client, dir.path(), 2).with_run_id("run", 1);

        let results = pipeline.generate(&request(vec![], 4)).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results[0].is_success());
        assert_eq!(results[1].failure_reason(), Some(&GenerationFailure::RateLimited("busy".into())));
        assert!(results[2].is_success());
        assert_eq!(results[3].failure_reason(), Some(&GenerationFailure::Timeout));
    }

    #[test]
    fn undecodable_payload_is_malformed_response() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new().respond_with(0, b"garbage".to_vec());
        let pipeline = GenerationPipeline::new(&client, dir.path(), 1).with_run_id("run", 1);
        let results = pipeline.generate(&request(vec![], 1)).unwrap();
        assert!(matches!(
            results[0].failure_reason(),
            Some(GenerationFailure::MalformedResponse(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn cycles_prompts_and_sends_references_in_order() {
        let dir = TempDir::new().unwrap();
        let first = write_test_photo(&dir.path().join("one.jpg"), 8, 8, [255, 0, 0]);
        let second = write_test_photo(&dir.path().join("two.jpg"), 8, 8, [0, 0, 255]);
        let client = ScriptedImageClient::new();
        let pipeline =
            GenerationPipeline::new(&client, dir.path().join("out"), 1).with_run_id("run", 100);

        pipeline.generate(&request(vec![first.clone(), second], 3)).unwrap();
        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        let prompts: Vec<_> = calls.iter().map(|c| c.prompt.as_str()).collect();
        assert_eq!(prompts, ["prompt for a", "prompt for b", "prompt for a"]);
        let expected_first = encode_reference(&first).unwrap();
        assert!(calls.iter().all(|c| c.reference_images.len() == 2));
        assert_eq!(calls[0].reference_images[0], expected_first);
        assert!(expected_first.starts_with("data:image/jpeg;base64,"));
        let seeds: Vec<_> = calls.iter().map(|c| c.seed).collect();
        assert_eq!(seeds, [100, 100 + SEED_STRIDE, 100 + 2 * SEED_STRIDE]);
    }

    #[test]
    fn regenerate_writes_a_new_file() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new();
        let pipeline = GenerationPipeline::new(&client, dir.path(), 3).with_run_id("run", 1);
        let request = request(vec![], 3);

        let original = pipeline.generate(&request).unwrap();
        let replacement = pipeline.regenerate(&request, 1, 1).unwrap();
        assert_eq!(replacement.index, 1);
        assert_eq!(replacement.path().unwrap(), dir.path().join("portrait_run_002_r1.jpg"));
        assert!(original[1].path().unwrap().exists());
        assert!(pipeline.regenerate(&request, 3, 1).is_err());
    }

    #[test]
    fn separate_runs_never_share_file_names() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new();
        let request = request(vec![], 2);

        let first = GenerationPipeline::new(&client, dir.path(), 2).generate(&request).unwrap();
        let second = GenerationPipeline::new(&client, dir.path(), 2).generate(&request).unwrap();
        let pinned = GenerationPipeline::new(&client, dir.path(), 2).with_run_id("same", 1);
        let third = pinned.generate(&request).unwrap();
        let fourth = pinned.generate(&request).unwrap();

        let mut paths: Vec<_> = [first, second, third, fourth]
            .iter()
            .flatten()
            .map(|r| r.path().unwrap().to_path_buf())
            .collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 8);
        assert!(paths.contains(&dir.path().join("portrait_same_001_1.jpg")));
    }

    #[test]
    fn quality_gate_rejects_small_and_flat_images() {
        use image::{DynamicImage, Rgb, RgbImage};
        use std::io::Cursor;

        fn png(image: RgbImage) -> Vec<u8> {
            let mut bytes = Vec::new();
            DynamicImage::ImageRgb8(image)
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .unwrap();
            bytes
        }
        let detailed = RgbImage::from_fn(520, 520, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 { Rgb([250, 250, 250]) } else { Rgb([10, 10, 10]) }
        });
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new()
            .respond_with(0, png(RgbImage::from_pixel(300, 300, Rgb([1, 2, 3]))))
            .respond_with(1, png(RgbImage::from_pixel(520, 520, Rgb([90, 90, 90]))))
            .respond_with(2, png(detailed));
        let gate = QualityGate { min_side: 512, min_sharpness: 30.0 };
        let pipeline = GenerationPipeline::new(&client, dir.path(), 3)
            .with_run_id("run", 1)
            .with_quality_gate(gate);

        let results = pipeline.generate(&request(vec![], 3)).unwrap();
        assert!(matches!(
            results[0].failure_reason(),
            Some(GenerationFailure::QualityCheck(m)) if m.contains("too small")
        ));
        assert!(matches!(
            results[1].failure_reason(),
            Some(GenerationFailure::QualityCheck(m)) if m.contains("blurry")
        ));
        assert_eq!(results[2].path().unwrap(), dir.path().join("portrait_run_003.png"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_reference_is_invalid_photo() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedImageClient::new();
        let pipeline = GenerationPipeline::new(&client, dir.path(), 3);
        let err = pipeline.generate(&request(vec![dir.path().join("gone.jpg")], 1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPhoto { .. }));
        assert!(client.calls().is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn result_count_matches_request(count in 1usize..12, concurrency in 1usize..6, fail in 0usize..12) {
                let dir = TempDir::new().unwrap();
                let client = ScriptedImageClient::new().fail_with(fail, GenerationFailure::Timeout);
                let pipeline = GenerationPipeline::new(&client, dir.path(), concurrency).with_run_id("p", 0);
                let results = pipeline.generate(&request(vec![], count)).unwrap();
                prop_assert_eq!(results.len(), count);
                for (position, result) in results.iter().enumerate() {
                    prop_assert_eq!(result.index, position);
                    prop_assert_eq!(result.is_success(), position != fail);
                }
                prop_assert!(client.peak_concurrency() <= concurrency);
            }
        }
    }
}
