pub mod config;
pub mod history;
pub mod service;
pub mod telemetry;
