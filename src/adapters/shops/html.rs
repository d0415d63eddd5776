use crate::utils::error::{PriceAlertError, Result};
use scraper::{ElementRef, Html, Selector};

pub(crate) fn selector(shop: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PriceAlertError::parse(shop, format!("bad selector '{}': {}", css, e)))
}

pub(crate) fn first<'a>(doc: &'a Html, shop: &str, css: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(doc.select(&selector(shop, css)?).next())
}

pub(crate) fn parse_amount(shop: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(PriceAlertError::parse(shop, format!("'{}' is not a price", trimmed))),
    }
}

/// 讀取 `<meta ... content="49">` 的價格，找不到標籤時回傳 None
pub(crate) fn meta_price(doc: &Html, shop: &str, css: &str) -> Result<Option<f64>> {
    let Some(element) = first(doc, shop, css)? else {
        return Ok(None);
    };
    let content = element
        .value()
        .attr("content")
        .ok_or_else(|| PriceAlertError::parse(shop, format!("{} has no content attribute", css)))?;
    parse_amount(shop, content).map(Some)
}

pub(crate) fn required_meta_price(doc: &Html, shop: &str, css: &str) -> Result<f64> {
    meta_price(doc, shop, css)?
        .ok_or_else(|| PriceAlertError::parse(shop, format!("missing {}", css)))
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
