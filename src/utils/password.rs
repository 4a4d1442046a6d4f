use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// 验证密码强度
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 6 || password.len() > 128 {
        return Err(AppError::ValidationError(
            "Password must be between 6 and 128 characters.".to_string(),
        ));
    }

    Ok(())
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("failed to hash password: {e}")))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("failed to verify password: {e}")))
}
