use crate::entities::{ReviewStatus, review_entity as reviews};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i64,
    pub product_id: Option<i64>,
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub rating: i32,
    pub review: Option<String>,
    pub is_recommended: bool,
    pub status: ReviewStatus,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<reviews::Model> for ReviewResponse {
    fn from(m: reviews::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            user_id: m.user_id,
            title: m.title,
            rating: m.rating,
            review: m.review,
            is_recommended: m.is_recommended,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProduct {
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

/// 评论列表项，附带作者名与商品摘要
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewListItem {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub user: Option<ReviewAuthor>,
    pub product: Option<ReviewProduct>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreateRequest {
    /// 商品 id
    #[serde(alias = "productId")]
    pub product: Option<i64>,
    pub title: Option<String>,
    #[schema(example = 5)]
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_recommended: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub title: Option<String>,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub is_recommended: Option<bool>,
}
