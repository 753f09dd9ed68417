mod photos;
mod scripted_image_client;
mod scripted_reviewer;

pub use photos::write_test_photo;
pub use scripted_image_client::{RecordedCall, ScriptedImageClient, tiny_jpeg};
pub use scripted_reviewer::ScriptedReviewer;
