use crate::entities::{Role, user_entity as users};
use crate::models::{BrandResponse, MerchantResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 对外的用户信息，密码与重置令牌永不序列化
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub provider: String,
    pub avatar: Option<String>,
    pub merchant_id: Option<i64>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<users::Model> for UserResponse {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            phone_number: m.phone_number,
            first_name: m.first_name,
            last_name: m.last_name,
            role: m.role,
            provider: m.provider,
            avatar: m.avatar,
            merchant_id: m.merchant_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// `GET /user/me`：附带所属商家及其品牌
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub merchant: Option<MerchantResponse>,
    pub brand: Option<BrandResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileUpdateBody {
    pub profile: ProfileUpdate,
}
