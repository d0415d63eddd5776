// One checker per supported shop. Each one turns a product page into a PriceQuote.

pub mod baechli;
pub mod galaxus;
pub(crate) mod html;
pub mod intersport;
pub mod primal;
pub mod transa;

use crate::domain::ports::ShopChecker;
use crate::utils::error::{PriceAlertError, Result};
use std::sync::Arc;

pub const SUPPORTED_SHOPS: [&str; 5] = ["galaxus", "baechli", "intersport", "primal", "transa"];

/// 依 `check_func` 名稱取得對應的解析器，`check_` 前綴可省略
pub fn checker_for(check_func: &str) -> Result<Arc<dyn ShopChecker>> {
    let name = check_func.trim();
    let id = name.strip_prefix("check_").unwrap_or(name);

    let checker: Arc<dyn ShopChecker> = match id {
        "galaxus" => Arc::new(galaxus::GalaxusChecker),
        "baechli" => Arc::new(baechli::BaechliChecker),
        "intersport" => Arc::new(intersport::IntersportChecker),
        "primal" => Arc::new(primal::PrimalChecker),
        "transa" => Arc::new(transa::TransaChecker),
        _ => {
            return Err(PriceAlertError::CheckFuncNotFound {
                name: check_func.to_string(),
            })
        }
    };
    Ok(checker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_lookup_accepts_both_spellings() {
        for id in SUPPORTED_SHOPS {
            assert_eq!(checker_for(id).unwrap().id(), id);
            assert_eq!(checker_for(&format!("check_{}", id)).unwrap().id(), id);
        }
    }

    #[test]
    fn test_unknown_checker() {
        assert!(matches!(
            checker_for("check_digitec"),
            Err(PriceAlertError::CheckFuncNotFound { .. })
        ));
    }
}
