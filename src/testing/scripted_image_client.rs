use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};

use crate::domain::GenerationFailure;
use crate::ports::{GeneratedImage, ImageCall, ImageClient};

/// Owned copy of an `ImageCall` for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub index: usize,
    pub prompt: String,
    pub negative_prompt: String,
    pub reference_images: Vec<String>,
    pub seed: u64,
}

/// Image client returning tiny JPEGs, with per-index failures and overrides.
#[derive(Clone, Default)]
pub struct ScriptedImageClient {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failures: BTreeMap<usize, GenerationFailure>,
    one_shot: Arc<Mutex<BTreeMap<usize, GenerationFailure>>>,
    payloads: BTreeMap<usize, Vec<u8>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    remote: bool,
}

impl ScriptedImageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(mut self, index: usize, failure: GenerationFailure) -> Self {
        self.failures.insert(index, failure);
        self
    }

    /// Fail the first call for `index` only; later calls succeed.
    pub fn fail_once(self, index: usize, failure: GenerationFailure) -> Self {
        self.one_shot.lock().unwrap().insert(index, failure);
        self
    }

    /// Behave like a real API client, so the quality gate applies.
    pub fn as_remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn respond_with(mut self, index: usize, bytes: Vec<u8>) -> Self {
        self.payloads.insert(index, bytes);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort_by_key(|c| c.index);
        calls
    }

    /// Highest number of calls observed in flight at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub fn tiny_jpeg() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(4, 4, Rgb([100, 150, 200]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

impl ImageClient for ScriptedImageClient {
    fn generate(&self, call: &ImageCall<'_>) -> Result<GeneratedImage, GenerationFailure> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            index: call.index,
            prompt: call.prompt.to_string(),
            negative_prompt: call.negative_prompt.to_string(),
            reference_images: call.reference_images.to_vec(),
            seed: call.seed,
        });
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.get(&call.index) {
            return Err(failure.clone());
        }
        if let Some(failure) = self.one_shot.lock().unwrap().remove(&call.index) {
            return Err(failure);
        }
        let bytes = self.payloads.get(&call.index).cloned().unwrap_or_else(tiny_jpeg);
        Ok(GeneratedImage { bytes })
    }

    fn produces_placeholders(&self) -> bool {
        !self.remote
    }
}
