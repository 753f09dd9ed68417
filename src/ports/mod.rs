mod image_client;
mod review_prompter;
mod template_store;

pub use image_client::{GeneratedImage, ImageCall, ImageClient};
pub use review_prompter::{ReviewCommand, ReviewPrompter};
pub use template_store::TemplateStore;
