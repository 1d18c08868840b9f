pub mod audio;
pub mod config;
pub mod demo;
pub mod dispatch;
pub mod services;
pub mod speech;
pub mod telemetry;
pub mod voice;
pub mod web;

pub use config::AssistantConfig;
pub use dispatch::{Dispatcher, Response};
