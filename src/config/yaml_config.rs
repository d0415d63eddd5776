use crate::adapters::shops;
use crate::utils::error::{PriceAlertError, Result};
use crate::utils::validation::{self, Validate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:74.0) Gecko/20100101 Firefox/74.0";
pub const DEFAULT_CURRENCY: &str = "CHF";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_CONCURRENT_REQUESTS: usize = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct PriceAlertConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub shops: BTreeMap<String, ShopConfig>,
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsConfig {
    pub currency: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
    pub history_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    pub name: String,
    pub check_func: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    pub threshold: Option<f64>,
    /// 商店 id 與商品網址，保留設定檔中的順序
    #[serde(deserialize_with = "ordered_shop_urls")]
    pub shops: Vec<ProductShop>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductShop {
    pub shop_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_true")]
    pub console: bool,
    pub webhook_url: Option<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            console: true,
            webhook_url: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn ordered_shop_urls<'de, D>(deserializer: D) -> std::result::Result<Vec<ProductShop>, D::Error>
where
    D: Deserializer<'de>,
{
    let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
    mapping
        .into_iter()
        .map(|(key, value)| {
            let shop_id = key
                .as_str()
                .ok_or_else(|| D::Error::custom("shop id must be a string"))?
                .to_string();
            let url = value
                .as_str()
                .ok_or_else(|| D::Error::custom(format!("url for shop '{}' must be a string", shop_id)))?
                .to_string();
            Ok(ProductShop { shop_id, url })
        })
        .collect()
}

impl PriceAlertConfig {
    /// 從 YAML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml_str(&content)
    }

    /// 從 YAML 字串解析配置
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(serde_yaml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${WEBHOOK_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PriceAlertError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.shops.is_empty() {
            return Err(PriceAlertError::MissingConfigError {
                field: "shops".to_string(),
            });
        }
        if self.products.is_empty() {
            return Err(PriceAlertError::MissingConfigError {
                field: "products".to_string(),
            });
        }

        for (shop_id, shop) in &self.shops {
            validation::validate_non_empty_string(&format!("shops.{}.name", shop_id), &shop.name)?;
            shops::checker_for(&shop.check_func)?;
        }

        let mut seen_names = HashSet::new();
        for (index, product) in self.products.iter().enumerate() {
            let field = format!("products[{}]", index);
            validation::validate_non_empty_string(&format!("{}.name", field), &product.name)?;
            if !seen_names.insert(product.name.as_str()) {
                return Err(PriceAlertError::InvalidConfigValueError {
                    field: format!("{}.name", field),
                    value: product.name.clone(),
                    reason: "Product names must be unique".to_string(),
                });
            }
            if let Some(threshold) = product.threshold {
                validation::validate_price(&format!("{}.threshold", field), threshold)?;
            }
            if product.shops.is_empty() {
                return Err(PriceAlertError::MissingConfigError {
                    field: format!("{}.shops", field),
                });
            }
            for entry in &product.shops {
                let shop_field = format!("{}.shops.{}", field, entry.shop_id);
                if !self.shops.contains_key(&entry.shop_id) {
                    return Err(PriceAlertError::InvalidConfigValueError {
                        field: shop_field,
                        value: entry.shop_id.clone(),
                        reason: "Shop is not defined under 'shops'".to_string(),
                    });
                }
                validation::validate_url(&shop_field, &entry.url)?;
            }
        }

        if let Some(concurrent) = self.settings.concurrent_requests {
            validation::validate_positive_number("settings.concurrent_requests", concurrent, 1)?;
        }
        if let Some(timeout) = self.settings.timeout_seconds {
            validation::validate_range("settings.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(history_file) = &self.settings.history_file {
            validation::validate_path("settings.history_file", history_file)?;
        }
        if let Some(webhook_url) = &self.alerts.webhook_url {
            validation::validate_url("alerts.webhook_url", webhook_url)?;
        }

        Ok(())
    }

    pub fn currency(&self) -> &str {
        self.settings.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn user_agent(&self) -> &str {
        self.settings.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn concurrent_requests(&self) -> usize {
        self.settings
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    pub fn history_file(&self) -> Option<&str> {
        self.settings.history_file.as_deref()
    }

    /// --dry-run 時列出會檢查的商品與網址
    pub fn describe_plan(&self) -> String {
        let mut out = format!(
            "Would check {} products ({} prices):\n",
            self.products.len(),
            self.total_checks()
        );
        for product in &self.products {
            match product.threshold {
                Some(threshold) => out.push_str(&format!(
                    "  {} (alert below {:.2} {})\n",
                    product.name,
                    threshold,
                    self.currency()
                )),
                None => out.push_str(&format!("  {}\n", product.name)),
            }
            for entry in &product.shops {
                let shop_name = self
                    .shops
                    .get(&entry.shop_id)
                    .map(|s| s.name.as_str())
                    .unwrap_or(entry.shop_id.as_str());
                out.push_str(&format!("    {}: {}\n", shop_name, entry.url));
            }
        }
        out.push_str(&format!(
            "Supported checkers: {}\n",
            shops::SUPPORTED_SHOPS.join(", ")
        ));
        out
    }

    /// 需要檢查的（商品, 商店）組合總數
    pub fn total_checks(&self) -> usize {
        self.products.iter().map(|p| p.shops.len()).sum()
    }
}

impl Validate for PriceAlertConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_CONFIG: &str = r#"
shops:
  galaxus:
    name: Galaxus
    check_func: check_galaxus
  transa:
    name: Transa
    check_func: transa
products:
  - name: Osprey Talon 22
    threshold: 100.0
    shops:
      transa: https://www.transa.ch/de/p/talon-22
      galaxus: https://www.galaxus.ch/de/s3/product/123
  - name: Black Diamond Headlamp
    shops:
      galaxus: https://www.galaxus.ch/de/s3/product/456
"#;

    #[test]
    fn test_parse_basic_yaml_config() {
        let config = PriceAlertConfig::from_yaml_str(BASIC_CONFIG).unwrap();

        assert_eq!(config.shops.len(), 2);
        assert_eq!(config.shops["galaxus"].name, "Galaxus");
        assert_eq!(config.products.len(), 2);
        assert_eq!(config.products[0].threshold, Some(100.0));
        assert_eq!(config.products[1].threshold, None);
        assert_eq!(config.total_checks(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_product_shops_keep_file_order() {
        let config = PriceAlertConfig::from_yaml_str(BASIC_CONFIG).unwrap();
        let ids: Vec<&str> = config.products[0]
            .shops
            .iter()
            .map(|s| s.shop_id.as_str())
            .collect();
        assert_eq!(ids, vec!["transa", "galaxus"]);
    }

    #[test]
    fn test_defaults_when_settings_missing() {
        let config = PriceAlertConfig::from_yaml_str(BASIC_CONFIG).unwrap();
        assert_eq!(config.currency(), "CHF");
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.concurrent_requests(), 4);
        assert!(config.history_file().is_none());
        assert!(config.alerts.console);
        assert!(config.alerts.webhook_url.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRICE_ALERT_TEST_HOOK", "https://hooks.example.com/abc");

        let yaml = format!(
            "{}alerts:\n  console: false\n  webhook_url: ${{PRICE_ALERT_TEST_HOOK}}\n",
            BASIC_CONFIG
        );
        let config = PriceAlertConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(
            config.alerts.webhook_url.as_deref(),
            Some("https://hooks.example.com/abc")
        );
        assert!(!config.alerts.console);

        std::env::remove_var("PRICE_ALERT_TEST_HOOK");
    }

    #[test]
    fn test_unknown_env_var_is_left_verbatim() {
        std::env::remove_var("PRICE_ALERT_SURELY_UNSET");

        let yaml = BASIC_CONFIG.replace("Black Diamond Headlamp", "Headlamp ${PRICE_ALERT_SURELY_UNSET}");
        let config = PriceAlertConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.products[1].name, "Headlamp ${PRICE_ALERT_SURELY_UNSET}");

        let yaml = format!("{}alerts:\n  webhook_url: ${{PRICE_ALERT_SURELY_UNSET}}\n", BASIC_CONFIG);
        let config = PriceAlertConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(
            config.alerts.webhook_url.as_deref(),
            Some("${PRICE_ALERT_SURELY_UNSET}")
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_must_be_within_range() {
        for (timeout, ok) in [(0, false), (1, true), (300, true), (301, false)] {
            let yaml = format!("settings:\n  timeout_seconds: {}\n{}", timeout, BASIC_CONFIG);
            let config = PriceAlertConfig::from_yaml_str(&yaml).unwrap();
            assert_eq!(config.validate().is_ok(), ok, "timeout_seconds: {}", timeout);
        }
    }

    #[test]
    fn test_webhook_must_be_http() {
        let yaml = format!("{}alerts:\n  webhook_url: ftp://hooks.example.com/x\n", BASIC_CONFIG);
        let config = PriceAlertConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PriceAlertError::InvalidConfigValueError { ref field, .. }) if field == "alerts.webhook_url"
        ));
    }

    #[test]
    fn test_describe_plan_lists_products_and_urls() {
        let config = PriceAlertConfig::from_yaml_str(BASIC_CONFIG).unwrap();
        let plan = config.describe_plan();
        let lines: Vec<&str> = plan.lines().collect();

        assert_eq!(lines[0], "Would check 2 products (3 prices):");
        assert_eq!(lines[1], "  Osprey Talon 22 (alert below 100.00 CHF)");
        assert_eq!(lines[2], "    Transa: https://www.transa.ch/de/p/talon-22");
        assert_eq!(lines[3], "    Galaxus: https://www.galaxus.ch/de/s3/product/123");
        assert_eq!(lines[4], "  Black Diamond Headlamp");
        assert!(lines[6].starts_with("Supported checkers: galaxus"));
    }

    #[test]
    fn test_unknown_check_func_is_rejected() {
        let yaml = r#"
shops:
  amazon:
    name: Amazon
    check_func: check_amazon
products:
  - name: Thing
    shops:
      amazon: https://www.amazon.de/dp/1
"#;
        let config = PriceAlertConfig::from_yaml_str(yaml).unwrap();
        match config.validate() {
            Err(PriceAlertError::CheckFuncNotFound { name }) => assert_eq!(name, "check_amazon"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_undefined_shop_reference_is_rejected() {
        let yaml = r#"
shops:
  galaxus:
    name: Galaxus
    check_func: check_galaxus
products:
  - name: Thing
    shops:
      primal: https://www.primal.ch/thing
"#;
        let config = PriceAlertConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PriceAlertError::InvalidConfigValueError { ref field, .. }) if field == "products[0].shops.primal"
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_url = BASIC_CONFIG.replace("https://www.galaxus.ch/de/s3/product/456", "not-a-url");
        assert!(PriceAlertConfig::from_yaml_str(&bad_url).unwrap().validate().is_err());

        let bad_threshold = BASIC_CONFIG.replace("threshold: 100.0", "threshold: -1.0");
        assert!(PriceAlertConfig::from_yaml_str(&bad_threshold).unwrap().validate().is_err());

        let duplicate = BASIC_CONFIG.replace("Black Diamond Headlamp", "Osprey Talon 22");
        assert!(PriceAlertConfig::from_yaml_str(&duplicate).unwrap().validate().is_err());

        let zero_concurrency = format!("settings:\n  concurrent_requests: 0\n{}", BASIC_CONFIG);
        assert!(PriceAlertConfig::from_yaml_str(&zero_concurrency).unwrap().validate().is_err());
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let err = PriceAlertConfig::from_yaml_str("shops: [unclosed").unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let yaml = format!(
            "settings:\n  currency: EUR\n  history_file: history.csv\n{}",
            BASIC_CONFIG
        );
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PriceAlertConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.currency(), "EUR");
        assert_eq!(config.history_file(), Some("history.csv"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PriceAlertConfig::from_file("/definitely/not/here/config.yml").unwrap_err();
        assert!(matches!(err, PriceAlertError::IoError(_)));
    }
}
