pub mod engine;

pub use crate::domain::model::{Alert, PriceQuote, PriceReport, ProductReport, ShopPrice};
pub use crate::domain::ports::{Notifier, PageFetcher, Pipeline, ShopChecker, Storage};
pub use crate::utils::error::Result;
