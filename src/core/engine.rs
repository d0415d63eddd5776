use crate::domain::model::PriceReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub struct PriceAlertEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PriceAlertEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 執行一次完整的價格檢查
    pub async fn run(&self) -> Result<PriceReport> {
        tracing::info!("Starting price check...");

        let prices = self.pipeline.extract().await?;
        let report = self.pipeline.transform(prices).await?;
        let summary = self.pipeline.load(&report).await?;

        tracing::info!(
            "✅ Price check finished: {} checks, {} failed, {} alerts, {} history rows",
            report.total_checks(),
            report.failed_checks(),
            report.alerts.len(),
            summary.history_rows
        );
        Ok(report)
    }

    /// 每隔 `interval` 執行一次，直到 Ctrl-C 或跑滿 `max_runs` 次。
    /// 單次失敗只記錄，不中斷排程。回傳實際執行的次數。
    pub async fn run_periodically(&self, interval: Duration, max_runs: Option<usize>) -> usize {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut runs = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    tracing::info!("🛑 Interrupted, stopping after {} runs", runs);
                    break;
                }
            }

            runs += 1;
            match self.run().await {
                Ok(report) if !report.alerts.is_empty() => {
                    tracing::info!("🔔 Run {}: {} products below threshold", runs, report.alerts.len());
                }
                Ok(_) => tracing::debug!("Run {} finished without alerts", runs),
                Err(e) => tracing::error!(
                    "❌ Run {} failed: {} (Category: {:?}, Severity: {:?})",
                    runs,
                    e,
                    e.category(),
                    e.severity()
                ),
            }

            if max_runs.is_some_and(|max| runs >= max) {
                break;
            }
            tracing::info!("⏳ Next check in {:?}", interval);
        }
        runs
    }
}
