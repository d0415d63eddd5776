use crate::adapters::{notify, shops};
use crate::config::yaml_config::PriceAlertConfig;
use crate::domain::model::{LoadSummary, PriceQuote, PriceReport, ProductReport, ShopPrice};
use crate::domain::ports::{Notifier, PageFetcher, Pipeline, ShopChecker, Storage};
use crate::utils::error::{PriceAlertError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// 單一（商品, 商店）檢查工作
struct CheckJob {
    product: String,
    shop_id: String,
    shop_name: String,
    url: String,
    checker: Arc<dyn ShopChecker>,
}

async fn check_one<F: PageFetcher + ?Sized>(
    fetcher: &F,
    checker: &dyn ShopChecker,
    url: &str,
) -> Result<PriceQuote> {
    let page = fetcher.fetch(url).await?;
    checker.check(&page)
}

pub struct PricePipeline<S: Storage, F: PageFetcher + 'static> {
    storage: S,
    fetcher: Arc<F>,
    config: PriceAlertConfig,
    checkers: HashMap<String, Arc<dyn ShopChecker>>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl<S: Storage, F: PageFetcher + 'static> PricePipeline<S, F> {
    pub fn new(storage: S, fetcher: F, config: PriceAlertConfig) -> Result<Self> {
        let mut checkers = HashMap::new();
        for (shop_id, shop) in &config.shops {
            checkers.insert(shop_id.clone(), shops::checker_for(&shop.check_func)?);
        }
        let notifiers = notify::build_notifiers(&config.alerts, config.currency(), config.timeout())?;

        Ok(Self {
            storage,
            fetcher: Arc::new(fetcher),
            config,
            checkers,
            notifiers,
        })
    }

    /// 取代設定檔產生的通知管道（空陣列即停用通知）
    pub fn with_notifiers(mut self, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        self.notifiers = notifiers;
        self
    }

    fn jobs(&self) -> Result<Vec<CheckJob>> {
        let mut jobs = Vec::with_capacity(self.config.total_checks());
        for product in &self.config.products {
            for entry in &product.shops {
                let (shop, checker) = self
                    .config
                    .shops
                    .get(&entry.shop_id)
                    .zip(self.checkers.get(&entry.shop_id))
                    .ok_or_else(|| PriceAlertError::ConfigError {
                        message: format!(
                            "product '{}' references unknown shop '{}'",
                            product.name, entry.shop_id
                        ),
                    })?;

                jobs.push(CheckJob {
                    product: product.name.clone(),
                    shop_id: entry.shop_id.clone(),
                    shop_name: shop.name.clone(),
                    url: entry.url.clone(),
                    checker: Arc::clone(checker),
                });
            }
        }
        Ok(jobs)
    }

    async fn write_history(&self, report: &PriceReport) -> Result<usize> {
        let Some(history_file) = self.config.history_file() else {
            return Ok(0);
        };

        let write_header = !self.storage.exists(history_file).await;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if write_header {
            writer.write_record(["checked_at", "product", "shop", "url", "current", "regular"])?;
        }

        let checked_at = report.checked_at.to_rfc3339();
        let mut rows = 0;
        for product in &report.products {
            for price in &product.prices {
                let Some(quote) = price.quote() else {
                    continue;
                };
                let current = format!("{:.2}", quote.current);
                let regular = quote.regular.map(|r| format!("{:.2}", r)).unwrap_or_default();
                writer.write_record([
                    checked_at.as_str(),
                    product.name.as_str(),
                    price.shop_id.as_str(),
                    price.url.as_str(),
                    current.as_str(),
                    regular.as_str(),
                ])?;
                rows += 1;
            }
        }

        let data = writer.into_inner().map_err(|e| e.into_error())?;
        if rows > 0 || write_header {
            self.storage.append_file(history_file, &data).await?;
        }
        tracing::debug!("Appended {} rows to {}", rows, history_file);
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl<S: Storage, F: PageFetcher + 'static> Pipeline for PricePipeline<S, F> {
    async fn extract(&self) -> Result<Vec<ShopPrice>> {
        let jobs = self.jobs()?;
        let concurrency = self.config.concurrent_requests();
        tracing::info!(
            "🚀 Checking {} prices ({} at a time)",
            jobs.len(),
            concurrency
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();
        let total = jobs.len();

        for (index, job) in jobs.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = check_one(fetcher.as_ref(), job.checker.as_ref(), &job.url).await;
                match &outcome {
                    Ok(quote) => tracing::debug!(
                        "✅ {} @ {}: {:.2} (regular {:?})",
                        job.product,
                        job.shop_name,
                        quote.current,
                        quote.regular
                    ),
                    Err(e) => tracing::warn!(
                        "⚠️ Price check failed for '{}' at {}: {}",
                        job.product,
                        job.shop_name,
                        e
                    ),
                }

                let price = ShopPrice {
                    product: job.product,
                    shop_id: job.shop_id,
                    shop_name: job.shop_name,
                    url: job.url,
                    outcome: outcome.map_err(|e| e.to_string()),
                };
                (index, price)
            });
        }

        // 依設定順序排列，不受完成順序影響
        let mut slots: Vec<Option<ShopPrice>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, price) = joined?;
            slots[index] = Some(price);
        }

        let prices: Vec<ShopPrice> = slots.into_iter().flatten().collect();
        tracing::info!(
            "📊 Extracted {} prices, {} failed",
            prices.len(),
            prices.iter().filter(|p| p.outcome.is_err()).count()
        );
        Ok(prices)
    }

    async fn transform(&self, data: Vec<ShopPrice>) -> Result<PriceReport> {
        let checked_at = Utc::now();

        let mut by_product: HashMap<String, Vec<ShopPrice>> = HashMap::new();
        for price in data {
            by_product.entry(price.product.clone()).or_default().push(price);
        }

        let products: Vec<ProductReport> = self
            .config
            .products
            .iter()
            .map(|product| ProductReport {
                name: product.name.clone(),
                threshold: product.threshold,
                prices: by_product.remove(&product.name).unwrap_or_default(),
            })
            .collect();

        let alerts: Vec<_> = products.iter().flat_map(|p| p.alerts(checked_at)).collect();
        tracing::info!(
            "🔧 Built report for {} products, {} below threshold",
            products.len(),
            alerts.len()
        );

        Ok(PriceReport {
            checked_at,
            products,
            alerts,
        })
    }

    async fn load(&self, report: &PriceReport) -> Result<LoadSummary> {
        print!("{}", report.render(self.config.currency()));

        let mut summary = LoadSummary::default();

        // 先送出提醒，歷史檔寫入失敗不能擋住通知
        for alert in &report.alerts {
            for notifier in &self.notifiers {
                match notifier.notify(alert).await {
                    Ok(()) => summary.alerts_sent += 1,
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Could not send alert for '{}' via {}: {}",
                            alert.product,
                            notifier.channel(),
                            e
                        );
                        summary.notification_failures += 1;
                    }
                }
            }
        }

        if !report.alerts.is_empty() {
            tracing::info!(
                "🔔 {} alerts delivered, {} failed",
                summary.alerts_sent,
                summary.notification_failures
            );
        }

        summary.history_rows = self.write_history(report).await?;
        Ok(summary)
    }
}
