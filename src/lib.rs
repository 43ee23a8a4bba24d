#[path = "config.rs"]
pub mod config;

#[path = "error.rs"]
pub mod error;

#[path = "file_handler.rs"]
pub mod file_handler;

#[path = "fragment.rs"]
pub mod fragment;

#[path = "query_builder.rs"]
pub mod query_builder;

#[path = "types.rs"]
pub mod types;
