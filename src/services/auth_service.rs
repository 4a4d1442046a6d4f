use crate::entities::{Role, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let Some(email) = filled(&request.email) else {
            return Err(AppError::ValidationError(
                "You must enter an email address.".to_string(),
            ));
        };
        let (Some(first_name), Some(last_name)) =
            (filled(&request.first_name), filled(&request.last_name))
        else {
            return Err(AppError::ValidationError(
                "You must enter your full name.".to_string(),
            ));
        };
        let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
            return Err(AppError::ValidationError(
                "You must enter a password.".to_string(),
            ));
        };
        validate_email(email)?;
        validate_password(password)?;
        let email = normalize_email(email);

        // 检查邮箱是否已注册
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::DuplicateError(
                "That email address is already in use.".to_string(),
            ));
        }

        let user = users::ActiveModel {
            email: Set(Some(email)),
            first_name: Set(Some(first_name.to_string())),
            last_name: Set(Some(last_name.to_string())),
            password_hash: Set(Some(hash_password(password)?)),
            provider: Set("email".to_string()),
            role: Set(Role::Member),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("User registered: id={}", user.id);
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let (Some(email), Some(password)) = (
            filled(&request.email),
            request.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::ValidationError(
                "You must enter an email address and a password.".to_string(),
            ));
        };
        let email = normalize_email(email);

        let invalid = || AppError::AuthError("Email or password is incorrect.".to_string());
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(invalid)?;

        // 商家审核通过后尚未设置密码的账号无法登录
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(invalid());
        };
        if !verify_password(password, hash)? {
            return Err(invalid());
        }

        log::info!("User logged in: id={}", user.id);
        self.issue(user)
    }

    fn issue(&self, user: users::Model) -> AppResult<AuthResponse> {
        let token = self
            .jwt_service
            .generate_access_token(user.id, user.role, user.merchant_id)?;
        Ok(AuthResponse {
            success: true,
            token: format!("Bearer {token}"),
            user: user.into(),
        })
    }
}
