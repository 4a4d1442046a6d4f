//! 收藏、地址、留言、购物车与订单的请求/响应结构

use crate::entities::{
    CartItemStatus, address_entity as addresses, cart_item_entity as cart_items,
    contact_entity as contacts, order_entity as orders, wishlist_entity as wishlists,
};
use crate::models::ProductSearchItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    #[serde(alias = "productId")]
    pub product: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub is_liked: bool,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<wishlists::Model> for WishlistResponse {
    fn from(m: wishlists::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            user_id: m.user_id,
            is_liked: m.is_liked,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WishlistItem {
    #[serde(flatten)]
    pub wishlist: WishlistResponse,
    pub product: Option<ProductSearchItem>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i64,
    pub user_id: i64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub is_default: bool,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<addresses::Model> for AddressResponse {
    fn from(m: addresses::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            address: m.address,
            city: m.city,
            state: m.state,
            country: m.country,
            zip_code: m.zip_code,
            is_default: m.is_default,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

impl From<contacts::Model> for ContactResponse {
    fn from(m: contacts::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItemInput {
    /// 商品 id
    #[serde(alias = "productId")]
    pub product: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartAddRequest {
    pub products: Vec<CartItemInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub purchase_price: f64,
    pub total_price: f64,
    pub price_with_tax: f64,
    pub total_tax: f64,
    pub status: CartItemStatus,
}

impl From<cart_items::Model> for CartItemResponse {
    fn from(m: cart_items::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            quantity: m.quantity,
            purchase_price: m.purchase_price,
            total_price: m.total_price,
            price_with_tax: m.price_with_tax,
            total_tax: m.total_tax,
            status: m.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: i64,
    pub user_id: i64,
    pub products: Vec<CartItemResponse>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddRequest {
    pub cart_id: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub cart_id: i64,
    pub user_id: i64,
    pub total: f64,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<orders::Model> for OrderResponse {
    fn from(m: orders::Model) -> Self {
        Self {
            id: m.id,
            cart_id: m.cart_id,
            user_id: m.user_id,
            total: m.total,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
