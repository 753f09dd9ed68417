use crate::adapters::embedded_template_store::EmbeddedTemplateStore;
use crate::adapters::image_client_http::HttpImageClient;
use crate::adapters::image_client_mock::MockImageClient;
use crate::app::config::load_config;
use crate::domain::configuration::StudioDirs;
use crate::domain::{AppError, Credentials, StudioConfig, StudioHome};
use crate::ports::{ImageClient, TemplateStore};

/// Environment switch forcing the mock image client.
pub const MOCK_ENV: &str = "MOCK_API";

/// Application context holding configuration and dependencies for command execution.
pub struct AppContext<S: TemplateStore> {
    home: StudioHome,
    config: StudioConfig,
    credentials: Credentials,
    templates: S,
    mock_env: bool,
}

impl AppContext<EmbeddedTemplateStore> {
    /// Load configuration and credentials for `home`.
    pub fn open(home: StudioHome) -> Result<Self, AppError> {
        let config = load_config(&home)?;
        let templates = EmbeddedTemplateStore::new(home.custom_templates_file());
        let mock_env = std::env::var(MOCK_ENV)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        Ok(Self::new(home, config, Credentials::from_env(), templates).with_mock_env(mock_env))
    }
}

impl<S: TemplateStore> AppContext<S> {
    pub fn new(home: StudioHome, config: StudioConfig, credentials: Credentials, templates: S) -> Self {
        Self { home, config, credentials, templates, mock_env: false }
    }

    pub fn with_mock_env(mut self, enabled: bool) -> Self {
        self.mock_env = enabled;
        self
    }

    pub fn home(&self) -> &StudioHome {
        &self.home
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn templates(&self) -> &S {
        &self.templates
    }

    pub fn dirs(&self) -> StudioDirs {
        self.home.dirs(&self.config.paths)
    }

    /// Mock mode is on when requested by flag, environment or configuration.
    pub fn mock_enabled(&self, flag: bool) -> bool {
        flag || self.mock_env || self.config.mock.enabled
    }

    /// Build the image client; the real one requires an API key.
    pub fn image_client(&self, mock_flag: bool) -> Result<Box<dyn ImageClient>, AppError> {
        if self.mock_enabled(mock_flag) {
            return Ok(Box::new(MockImageClient::new(&self.config.mock)));
        }
        let api_key = self.credentials.api_key()?.to_string();
        Ok(Box::new(HttpImageClient::new(api_key, &self.config.api)?))
    }
}
