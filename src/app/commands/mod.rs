pub mod add_template;
pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod generate;
