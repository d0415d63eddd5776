pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, yaml_config::PriceAlertConfig};

pub use adapters::http::HttpFetcher;
pub use app::pipelines::price_pipeline::PricePipeline;
pub use core::engine::PriceAlertEngine;
pub use utils::error::{PriceAlertError, Result};
