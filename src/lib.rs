pub mod config;
pub mod models;
pub mod provider;
pub mod report;
pub mod scoring;

/// Application name for XDG paths
pub const APP_NAME: &str = "fishcast";
