pub mod browse;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod images;
pub mod loader;
pub mod normalizer;
pub mod reconcile;
pub mod server;
pub mod sheet;
pub mod source;
