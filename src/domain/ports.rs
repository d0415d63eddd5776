use crate::domain::model::{Alert, LoadSummary, PriceQuote, PriceReport, ShopPrice};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 價格歷史等附加寫入用的儲存
pub trait Storage: Send + Sync {
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// 取得商品頁面原始內容
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// 從某商店的頁面內容解析價格
pub trait ShopChecker: Send + Sync {
    fn id(&self) -> &'static str;
    fn check(&self, page: &str) -> Result<PriceQuote>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &str;
    async fn notify(&self, alert: &Alert) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ShopPrice>>;
    async fn transform(&self, data: Vec<ShopPrice>) -> Result<PriceReport>;
    async fn load(&self, report: &PriceReport) -> Result<LoadSummary>;
}
