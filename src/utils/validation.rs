use crate::utils::error::{PriceAlertError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PriceAlertError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_price(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Price must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PriceAlertError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("products[0].shops.galaxus", "https://www.galaxus.ch/de/s3/product/1").is_ok());
        assert!(validate_url("alerts.webhook_url", "http://localhost:8080/hook").is_ok());
        assert!(validate_url("alerts.webhook_url", "").is_err());
        assert!(validate_url("alerts.webhook_url", "invalid-url").is_err());
        assert!(validate_url("alerts.webhook_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("settings.concurrent_requests", 4, 1).is_ok());
        assert!(validate_positive_number("settings.concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("products[0].threshold", 99.9).is_ok());
        assert!(validate_price("products[0].threshold", 0.0).is_err());
        assert!(validate_price("products[0].threshold", -5.0).is_err());
        assert!(validate_price("products[0].threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_range_and_strings() {
        assert!(validate_range("settings.timeout_seconds", 30u64, 1, 300).is_ok());
        assert!(validate_range("settings.timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_non_empty_string("shops.galaxus.name", "  ").is_err());
        assert!(validate_path("settings.history_file", "").is_err());
        assert!(validate_path("settings.history_file", "history.csv").is_ok());
    }
}
