use crate::entities::product_entity as products;
use crate::error::{AppError, AppResult};
use crate::models::{ActiveUpdate, BrandSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub taxable: bool,
    pub is_active: bool,
    pub brand_id: Option<i64>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<products::Model> for ProductResponse {
    fn from(m: products::Model) -> Self {
        Self {
            id: m.id,
            sku: m.sku,
            name: m.name,
            slug: m.slug,
            image_url: m.image_url,
            image_key: m.image_key,
            description: m.description,
            quantity: m.quantity,
            price: m.price,
            taxable: m.taxable,
            is_active: m.is_active,
            brand_id: m.brand_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductWithBrand {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub brand: Option<BrandSummary>,
}

/// 按名称搜索的精简结果
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub price: f64,
}

impl From<products::Model> for ProductSearchItem {
    fn from(m: products::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            image_url: m.image_url,
            price: m.price,
        }
    }
}

/// 商品目录列表项，评分只统计已审核通过的评论
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub brand: Option<BrandSummary>,
    pub average_rating: f64,
    pub total_reviews: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateRequest {
    #[schema(example = "SKU-001")]
    pub sku: Option<String>,
    #[schema(example = "Trail Runner")]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[schema(example = "Lightweight trail running shoe")]
    pub description: Option<String>,
    #[schema(example = 10)]
    pub quantity: Option<i32>,
    #[schema(example = 129.99)]
    pub price: Option<f64>,
    pub taxable: Option<bool>,
    pub is_active: Option<bool>,
    /// 品牌 id；商家账号忽略此字段，始终挂在自己的品牌下
    pub brand: Option<i64>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub taxable: Option<bool>,
    pub is_active: Option<bool>,
    pub brand: Option<i64>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductUpdateBody {
    pub product: ProductUpdate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductActiveBody {
    pub product: ActiveUpdate,
}

/// `GET /product/list` 的查询参数
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// JSON 对象，例如 `{"price":-1}`
    pub sort_order: Option<String>,
    /// 最低平均评分
    pub rating: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// 分类 slug
    pub category: Option<String>,
    /// 品牌 slug
    pub brand: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    Price,
    Name,
    AverageRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSort {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for CatalogSort {
    fn default() -> Self {
        Self {
            field: SortField::Created,
            ascending: false,
        }
    }
}

impl CatalogSort {
    /// 解析 `{"<field>": 1 | -1}`，未提供时按创建时间倒序
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(Self::default());
        };

        let invalid = || AppError::ValidationError("Invalid sort order.".to_string());
        let value: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(raw).map_err(|_| invalid())?;
        let Some((key, direction)) = value.into_iter().next() else {
            return Ok(Self::default());
        };

        let field = match key.as_str() {
            "created" | "_id" | "id" => SortField::Created,
            "price" => SortField::Price,
            "name" => SortField::Name,
            "averageRating" => SortField::AverageRating,
            _ => return Err(invalid()),
        };
        let ascending = match direction.as_i64() {
            Some(1) => true,
            Some(-1) => false,
            _ => return Err(invalid()),
        };

        Ok(Self { field, ascending })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_defaults_to_newest_first() {
        assert_eq!(CatalogSort::parse(None).unwrap(), CatalogSort::default());
        assert_eq!(CatalogSort::parse(Some("")).unwrap(), CatalogSort::default());
        assert_eq!(CatalogSort::parse(Some("{}")).unwrap(), CatalogSort::default());
    }

    #[test]
    fn test_sort_parses_known_fields() {
        let sort = CatalogSort::parse(Some(r#"{"price":1}"#)).unwrap();
        assert_eq!(sort.field, SortField::Price);
        assert!(sort.ascending);

        let sort = CatalogSort::parse(Some(r#"{"_id":-1}"#)).unwrap();
        assert_eq!(sort.field, SortField::Created);
        assert!(!sort.ascending);

        let sort = CatalogSort::parse(Some(r#"{"averageRating":-1}"#)).unwrap();
        assert_eq!(sort.field, SortField::AverageRating);
    }

    #[test]
    fn test_sort_rejects_garbage() {
        assert!(CatalogSort::parse(Some("price")).is_err());
        assert!(CatalogSort::parse(Some(r#"{"password":1}"#)).is_err());
        assert!(CatalogSort::parse(Some(r#"{"price":2}"#)).is_err());
    }
}
