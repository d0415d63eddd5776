//! achermannsport.ch (Intersport), a WooCommerce shop.
//!
//! Discounted products wrap the old price in `<del>` and the new one in `<ins>`
//! directly under `p.price`; otherwise `p.price` holds a single amount.

use super::html;
use crate::domain::model::PriceQuote;
use crate::domain::ports::ShopChecker;
use crate::utils::error::{PriceAlertError, Result};
use scraper::{ElementRef, Html};

const SHOP: &str = "intersport";

pub struct IntersportChecker;

fn direct_child<'a>(parent: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == tag)
}

/// `<span class="amount"><span>CHF</span>&nbsp;379.00</span>` -> 379.0
fn amount_of(element: ElementRef<'_>) -> Result<f64> {
    let amount_selector = html::selector(SHOP, ".amount")?;
    let amount = element
        .select(&amount_selector)
        .next()
        .ok_or_else(|| PriceAlertError::parse(SHOP, "no .amount element inside price"))?;

    let text = html::text_of(amount);
    let text = text.trim();
    let (currency, value) = text
        .split_once('\u{a0}')
        .or_else(|| text.split_once(' '))
        .ok_or_else(|| PriceAlertError::parse(SHOP, format!("unexpected amount '{}'", text)))?;

    if currency.trim() != "CHF" {
        return Err(PriceAlertError::parse(
            SHOP,
            format!("unexpected currency '{}'", currency.trim()),
        ));
    }
    html::parse_amount(SHOP, value)
}

impl ShopChecker for IntersportChecker {
    fn id(&self) -> &'static str {
        SHOP
    }

    fn check(&self, page: &str) -> Result<PriceQuote> {
        let doc = Html::parse_document(page);
        let summary = html::first(&doc, SHOP, "div.entry-summary")?
            .ok_or_else(|| PriceAlertError::parse(SHOP, "missing div.entry-summary"))?;

        let price_selector = html::selector(SHOP, ".price")?;
        let prices = summary
            .select(&price_selector)
            .next()
            .ok_or_else(|| PriceAlertError::parse(SHOP, "missing .price in summary"))?;

        match (direct_child(prices, "del"), direct_child(prices, "ins")) {
            (Some(regular), Some(current)) => {
                PriceQuote::checked(SHOP, amount_of(current)?, Some(amount_of(regular)?))
            }
            _ => PriceQuote::checked(SHOP, amount_of(prices)?, None),
        }
    }
}
