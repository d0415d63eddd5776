//! primal.ch
//!
//! Current price: `<meta itemprop="price" content="284.90">`
//!
//! Regular price: `<span class="price--line-through">CHF&nbsp;469.00 *</span>`

use super::html;
use crate::domain::model::PriceQuote;
use crate::domain::ports::ShopChecker;
use crate::utils::error::{PriceAlertError, Result};
use regex::Regex;
use scraper::Html;

const SHOP: &str = "primal";

pub struct PrimalChecker;

impl PrimalChecker {
    fn line_through_price(text: &str) -> Result<f64> {
        let number = Regex::new(r"[\d.]+")
            .map_err(|e| PriceAlertError::parse(SHOP, e.to_string()))?;
        let found = number
            .find(text)
            .ok_or_else(|| PriceAlertError::parse(SHOP, format!("no number in '{}'", text.trim())))?;
        html::parse_amount(SHOP, found.as_str())
    }
}

impl ShopChecker for PrimalChecker {
    fn id(&self) -> &'static str {
        SHOP
    }

    fn check(&self, page: &str) -> Result<PriceQuote> {
        let doc = Html::parse_document(page);
        let current = html::required_meta_price(&doc, SHOP, r#"meta[itemprop="price"]"#)?;
        let regular = match html::first(&doc, SHOP, "span.price--line-through")? {
            Some(element) => Some(Self::line_through_price(&html::text_of(element))?),
            None => None,
        };
        PriceQuote::checked(SHOP, current, regular)
    }
}
