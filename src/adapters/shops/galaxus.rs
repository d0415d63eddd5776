//! galaxus.ch
//!
//! Current price: `<meta content="49" property="product:price:amount"/>`
//!
//! Regular price (only while discounted): `<meta content="72.4" property="og:price:standard_amount"/>`

use super::html;
use crate::domain::model::PriceQuote;
use crate::domain::ports::ShopChecker;
use crate::utils::error::Result;
use scraper::Html;

pub struct GalaxusChecker;

impl ShopChecker for GalaxusChecker {
    fn id(&self) -> &'static str {
        "galaxus"
    }

    fn check(&self, page: &str) -> Result<PriceQuote> {
        let doc = Html::parse_document(page);
        let current = html::required_meta_price(&doc, self.id(), r#"meta[property="product:price:amount"]"#)?;
        let regular = html::meta_price(&doc, self.id(), r#"meta[property="og:price:standard_amount"]"#)?;
        PriceQuote::checked(self.id(), current, regular)
    }
}
