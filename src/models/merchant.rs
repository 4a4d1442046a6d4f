use crate::entities::{MerchantStatus, merchant_entity as merchants};
use crate::models::{ActiveUpdate, BrandResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantResponse {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub brand_name: Option<String>,
    pub business: String,
    pub is_active: bool,
    pub brand_id: Option<i64>,
    pub status: MerchantStatus,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<merchants::Model> for MerchantResponse {
    fn from(m: merchants::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone_number: m.phone_number,
            brand_name: m.brand_name,
            business: m.business,
            is_active: m.is_active,
            brand_id: m.brand_id,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MerchantWithBrand {
    #[serde(flatten)]
    pub merchant: MerchantResponse,
    pub brand: Option<BrandResponse>,
}

/// 商家入驻申请
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantApplyRequest {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = "+15551234567")]
    pub phone_number: Option<String>,
    #[schema(example = "Jane's Shoes")]
    pub brand_name: Option<String>,
    #[schema(example = "Handmade leather shoes")]
    pub business: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MerchantActiveBody {
    pub merchant: ActiveUpdate,
}

/// 商家通过邮件链接完成注册
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSignupRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}
