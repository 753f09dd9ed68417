//! Image generation API client implementation using reqwest.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::configuration::ApiConfig;
use crate::domain::{AppError, GenerationFailure};
use crate::ports::{GeneratedImage, ImageCall, ImageClient};

/// HTTP client for the `images/generations` endpoint.
#[derive(Clone)]
pub struct HttpImageClient {
    api_key: String,
    api_url: Url,
    client: Client,
}

impl std::fmt::Debug for HttpImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpImageClient {
    /// Create a new HTTP client with the given API key and configuration.
    pub fn new(api_key: String, config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_key, api_url: config.url.clone(), client })
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImagePayload<'a>>,
    size: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    negative_prompt: &'a str,
    seed: u64,
    sequential_image_generation: &'static str,
    response_format: &'static str,
    watermark: bool,
}

/// A single reference is sent as a string, several as an array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ImagePayload<'a> {
    Single(&'a str),
    Multiple(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

fn classify_transport_error(error: &reqwest::Error) -> GenerationFailure {
    if error.is_timeout() {
        GenerationFailure::Timeout
    } else if error.is_decode() || error.is_body() {
        GenerationFailure::MalformedResponse(error.to_string())
    } else {
        GenerationFailure::NetworkFailure(error.to_string())
    }
}

impl ImageClient for HttpImageClient {
    fn generate(&self, call: &ImageCall<'_>) -> Result<GeneratedImage, GenerationFailure> {
        let image = match call.reference_images {
            [] => None,
            [single] => Some(ImagePayload::Single(single)),
            many => Some(ImagePayload::Multiple(many)),
        };
        let request = ApiRequest {
            model: call.model,
            prompt: call.prompt,
            image,
            size: call.size.size_param(),
            negative_prompt: call.negative_prompt,
            seed: call.seed,
            sequential_image_generation: "disabled",
            response_format: "b64_json",
            watermark: false,
        };

        let response = self
            .client
            .post(self.api_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        let body = response.text().map_err(|e| classify_transport_error(&e))?;

        if status.as_u16() == 429 {
            let message = extract_error_message(&body).unwrap_or_else(|| "429".to_string());
            return Err(GenerationFailure::RateLimited(message));
        }
        if !status.is_success() {
            let message = extract_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(GenerationFailure::ApiError { status: status.as_u16(), message });
        }

        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(GenerationFailure::ApiError {
                status: status.as_u16(),
                message: error.describe(),
            });
        }
        let datum = parsed.data.into_iter().next().ok_or_else(|| {
            GenerationFailure::MalformedResponse("response contains no image data".into())
        })?;

        if let Some(encoded) = datum.b64_json {
            let bytes = general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| GenerationFailure::MalformedResponse(format!("invalid base64: {}", e)))?;
            return Ok(GeneratedImage { bytes });
        }
        if let Some(url) = datum.url {
            return self.download(&url);
        }
        match datum.error {
            Some(error) => Err(GenerationFailure::ApiError {
                status: status.as_u16(),
                message: error.describe(),
            }),
            None => Err(GenerationFailure::MalformedResponse(
                "image entry has neither b64_json nor url".into(),
            )),
        }
    }
}

impl HttpImageClient {
    fn download(&self, url: &str) -> Result<GeneratedImage, GenerationFailure> {
        let response = self.client.get(url).send().map_err(|e| classify_transport_error(&e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationFailure::ApiError {
                status: status.as_u16(),
                message: format!("image download failed from {}", url),
            });
        }
        let bytes = response.bytes().map_err(|e| classify_transport_error(&e))?;
        Ok(GeneratedImage { bytes: bytes.to_vec() })
    }
}
