use crate::domain::AppError;

/// Environment variable holding the generation API key.
pub const API_KEY_ENV: &str = "ARK_API_KEY";

/// Secrets read once at startup and passed explicitly to the HTTP client.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    pub fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| AppError::MissingCredential(API_KEY_ENV.into()))
    }
}
