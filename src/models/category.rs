use crate::entities::category_entity as categories;
use crate::models::ActiveUpdate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// 关联的商品 id
    pub products: Vec<i64>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategoryResponse {
    pub fn new(m: categories::Model, products: Vec<i64>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            is_active: m.is_active,
            products,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreateRequest {
    #[schema(example = "Shoes")]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[schema(example = "All kinds of shoes")]
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub products: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// 提供时整体替换关联商品
    pub products: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryUpdateBody {
    pub category: CategoryUpdate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryActiveBody {
    pub category: ActiveUpdate,
}
