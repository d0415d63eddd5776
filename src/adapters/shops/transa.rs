//! transa.ch embeds its prices in an inline script object:
//!
//! ```text
//! price: {
//!   base: 'CHF 899.90',
//!   promo: 'CHF 629.90',
//!   savings: 'CHF 270.00',
//! },
//! ```
//!
//! `promo` is always the current price. `base` is empty unless the product is discounted.

use super::html;
use crate::domain::model::PriceQuote;
use crate::domain::ports::ShopChecker;
use crate::utils::error::{PriceAlertError, Result};
use regex::Regex;

const SHOP: &str = "transa";

pub struct TransaChecker;

impl ShopChecker for TransaChecker {
    fn id(&self) -> &'static str {
        SHOP
    }

    fn check(&self, page: &str) -> Result<PriceQuote> {
        let line = Regex::new(r"^\s*(base|promo): 'CHF ([^']*)',$")
            .map_err(|e| PriceAlertError::parse(SHOP, e.to_string()))?;

        let mut base = None;
        let mut promo = None;
        for caps in page.lines().filter_map(|l| line.captures(l)) {
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }
            let amount = html::parse_amount(SHOP, value)?;
            match &caps[1] {
                "promo" => promo = Some(amount),
                _ => base = Some(amount),
            }
        }

        let current = promo.ok_or_else(|| PriceAlertError::parse(SHOP, "no promo price found"))?;
        PriceQuote::checked(SHOP, current, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promo_page() {
        let page = "<script>\nvar product = {\n  price: {\n    base: 'CHF 899.90',\n    promo: 'CHF 629.90',\n    savings: 'CHF 270.00',\n    basicPrice: ''\n  },\n};\n</script>";
        let quote = TransaChecker.check(page).unwrap();
        assert_eq!(quote.current, 629.9);
        assert_eq!(quote.regular, Some(899.9));
    }

    #[test]
    fn test_non_promo_page_has_empty_base() {
        let page = "  price: {\n    base: '',\n    promo: 'CHF 379.90',\n    savings: 'CHF 0.00',\n  },";
        let quote = TransaChecker.check(page).unwrap();
        assert_eq!(quote.current, 379.9);
        assert_eq!(quote.regular, None);
    }

    #[test]
    fn test_missing_promo_fails() {
        assert!(TransaChecker.check("<html>nothing here</html>").is_err());
    }
}
