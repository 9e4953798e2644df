//! Application service layer - use cases, config, import, watch

pub mod app;
pub mod config;
pub mod repository;
