use crate::entities::brand_entity as brands;
use crate::models::ActiveUpdate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponse {
    pub id: i64,
    pub name: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub merchant_id: Option<i64>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<brands::Model> for BrandResponse {
    fn from(m: brands::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            is_active: m.is_active,
            merchant_id: m.merchant_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 商品详情中内嵌的品牌摘要
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandSummary {
    pub id: i64,
    pub name: Option<String>,
    pub slug: String,
    pub is_active: bool,
}

impl From<brands::Model> for BrandSummary {
    fn from(m: brands::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MerchantName {
    pub name: Option<String>,
}

/// 公开品牌列表项，附带商家名称
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandListItem {
    #[serde(flatten)]
    pub brand: BrandResponse,
    pub merchant: Option<MerchantName>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandCreateRequest {
    #[schema(example = "Acme")]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[schema(example = "Outdoor gear")]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BrandUpdateBody {
    pub brand: BrandUpdate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BrandActiveBody {
    pub brand: ActiveUpdate,
}
