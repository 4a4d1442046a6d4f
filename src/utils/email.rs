use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// 验证邮箱格式
pub fn validate_email(email: &str) -> AppResult<()> {
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError(
            "That email address is not valid.".to_string(),
        ));
    }
    Ok(())
}

/// 统一邮箱大小写与首尾空白
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@acme.com").is_ok());
        assert!(validate_email("first.last+tag@shop.co.uk").is_ok());
        assert!(validate_email("acme.com").is_err());
        assert!(validate_email("a@acme").is_err());
        assert!(validate_email("a b@acme.com").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@Acme.COM "), "a@acme.com");
    }
}
