pub mod catalogs;
pub mod dialoguer_review_prompter;
pub mod embedded_template_store;
pub mod image_client_http;
pub mod image_client_mock;
pub mod persist;
