//! baechli-bergsport.ch, which only publishes the current price.

use super::html;
use crate::domain::model::PriceQuote;
use crate::domain::ports::ShopChecker;
use crate::utils::error::Result;
use scraper::Html;

pub struct BaechliChecker;

impl ShopChecker for BaechliChecker {
    fn id(&self) -> &'static str {
        "baechli"
    }

    fn check(&self, page: &str) -> Result<PriceQuote> {
        let doc = Html::parse_document(page);
        let current = html::required_meta_price(&doc, self.id(), r#"meta[property="product:price:amount"]"#)?;
        PriceQuote::checked(self.id(), current, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_price_only() {
        let page = r#"<html><head>
            <meta content="49" property="product:price:amount"/>
            <meta content="72.4" property="og:price:standard_amount"/>
        </head></html>"#;

        let quote = BaechliChecker.check(page).unwrap();
        assert_eq!(quote.current, 49.0);
        assert_eq!(quote.regular, None);
    }

    #[test]
    fn test_bad_content_fails() {
        let page = r#"<meta content="auf Anfrage" property="product:price:amount"/>"#;
        assert!(BaechliChecker.check(page).is_err());
    }
}
