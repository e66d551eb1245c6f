pub mod app;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod query;
pub mod store;
pub mod ui;
pub mod view;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
