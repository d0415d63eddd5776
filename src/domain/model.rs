use crate::utils::error::{PriceAlertError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// 單一商品頁面上讀到的價格
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub current: f64,
    /// 折扣前的原價（劃線價），商店沒顯示時為 None
    pub regular: Option<f64>,
}

impl PriceQuote {
    /// 建立報價並確認原價高於現價
    pub fn checked(shop: &str, current: f64, regular: Option<f64>) -> Result<Self> {
        if let Some(regular) = regular {
            if regular <= current {
                return Err(PriceAlertError::InconsistentPrice {
                    shop: shop.to_string(),
                    current,
                    regular,
                });
            }
        }
        Ok(Self { current, regular })
    }
}

/// 一次價格檢查（某商品在某商店）的結果
#[derive(Debug, Clone)]
pub struct ShopPrice {
    pub product: String,
    pub shop_id: String,
    pub shop_name: String,
    pub url: String,
    pub outcome: std::result::Result<PriceQuote, String>,
}

impl ShopPrice {
    pub fn quote(&self) -> Option<&PriceQuote> {
        self.outcome.as_ref().ok()
    }
}

#[derive(Debug, Clone)]
pub struct ProductReport {
    pub name: String,
    pub threshold: Option<f64>,
    pub prices: Vec<ShopPrice>,
}

impl ProductReport {
    /// 成功檢查中最低的現價
    pub fn best_price(&self) -> Option<(&ShopPrice, f64)> {
        self.prices
            .iter()
            .filter_map(|p| p.quote().map(|q| (p, q.current)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn is_below_threshold(&self) -> bool {
        match (self.threshold, self.best_price()) {
            (Some(threshold), Some((_, price))) => price < threshold,
            _ => false,
        }
    }

    pub fn alerts(&self, checked_at: DateTime<Utc>) -> Vec<Alert> {
        let Some(threshold) = self.threshold else {
            return Vec::new();
        };

        self.prices
            .iter()
            .filter_map(|p| {
                let quote = p.quote()?;
                (quote.current < threshold).then(|| Alert {
                    product: self.name.clone(),
                    shop_name: p.shop_name.clone(),
                    url: p.url.clone(),
                    price: quote.current,
                    regular: quote.regular,
                    threshold,
                    checked_at,
                })
            })
            .collect()
    }
}

/// 價格低於門檻時發出的通知
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub product: String,
    pub shop_name: String,
    pub url: String,
    pub price: f64,
    pub regular: Option<f64>,
    pub threshold: f64,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PriceReport {
    pub checked_at: DateTime<Utc>,
    pub products: Vec<ProductReport>,
    pub alerts: Vec<Alert>,
}

impl PriceReport {
    pub fn total_checks(&self) -> usize {
        self.products.iter().map(|p| p.prices.len()).sum()
    }

    pub fn failed_checks(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| &p.prices)
            .filter(|p| p.outcome.is_err())
            .count()
    }

    /// 單次執行的結束碼：有任何檢查失敗時為 2
    pub fn exit_code(&self) -> i32 {
        if self.failed_checks() > 0 {
            2
        } else {
            0
        }
    }

    /// 以人類可讀格式輸出報告
    pub fn render(&self, currency: &str) -> String {
        let mut out = String::new();
        for product in &self.products {
            let _ = writeln!(out, "Checking {}:", product.name);
            for price in &product.prices {
                match &price.outcome {
                    Ok(quote) => {
                        let _ = write!(out, "  {}: {:.2} {}", price.shop_name, quote.current, currency);
                        if let Some(regular) = quote.regular {
                            let _ = write!(out, " (statt {:.2} {})", regular, currency);
                        }
                        out.push('\n');
                    }
                    Err(reason) => {
                        let _ = writeln!(out, "  {}: check failed ({})", price.shop_name, reason);
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

/// load 階段的統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub history_rows: usize,
    pub alerts_sent: usize,
    pub notification_failures: usize,
}
