mod credentials;
mod studio_config;
mod studio_home;

pub use credentials::{API_KEY_ENV, Credentials};
pub use studio_config::{ApiConfig, GenerationSettings, MockSettings, PathSettings, StudioConfig};
pub use studio_home::{HOME_ENV, StudioDirs, StudioHome};
