use crate::entities::{
    CartItemStatus, cart_entity as carts, cart_item_entity as cart_items,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

/// 单个购物车条目的价格快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPricing {
    pub purchase_price: f64,
    pub total_price: f64,
    pub total_tax: f64,
    pub price_with_tax: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 计税：仅对 taxable 商品按税率计算，金额保留两位小数
pub fn price_item(price: f64, quantity: i32, taxable: bool, tax_rate: f64) -> ItemPricing {
    let total_price = round2(price * f64::from(quantity));
    let total_tax = if taxable {
        round2(total_price * tax_rate)
    } else {
        0.0
    };
    ItemPricing {
        purchase_price: round2(price),
        total_price,
        total_tax,
        price_with_tax: round2(total_price + total_tax),
    }
}

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
    tax_rate: f64,
}

impl CartService {
    pub fn new(pool: DatabaseConnection, tax_rate: f64) -> Self {
        Self { pool, tax_rate }
    }

    pub async fn add_cart(&self, user: &CurrentUser, request: CartAddRequest) -> AppResult<CartResponse> {
        if request.products.is_empty() {
            return Err(AppError::ValidationError(
                "You must add at least one product.".to_string(),
            ));
        }
        if request.products.iter().any(|item| item.quantity < 1) {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1.".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let cart = carts::ActiveModel {
            user_id: Set(user.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.products.len());
        for input in &request.products {
            let product = products::Entity::find_by_id(input.product)
                .filter(products::Column::IsActive.eq(true))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("No product found.".to_string()))?;

            let pricing = price_item(product.price, input.quantity, product.taxable, self.tax_rate);
            let item = cart_items::ActiveModel {
                cart_id: Set(cart.id),
                product_id: Set(product.id),
                quantity: Set(input.quantity),
                purchase_price: Set(pricing.purchase_price),
                total_price: Set(pricing.total_price),
                price_with_tax: Set(pricing.price_with_tax),
                total_tax: Set(pricing.total_tax),
                status: Set(CartItemStatus::NotProcessed),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(CartItemResponse::from(item));
        }
        txn.commit().await?;

        log::info!("Cart {} created with {} items", cart.id, items.len());
        Ok(CartResponse {
            id: cart.id,
            user_id: cart.user_id,
            products: items,
            created_at: cart.created_at,
        })
    }

    pub async fn delete_cart(&self, user: &CurrentUser, cart_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let cart = carts::Entity::find_by_id(cart_id)
            .filter(carts::Column::UserId.eq(user.id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("No cart found.".to_string()))?;

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await?;
        carts::Entity::delete_by_id(cart.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_taxable_item() {
        let pricing = price_item(19.99, 3, true, 0.05);
        assert_eq!(pricing.purchase_price, 19.99);
        assert_eq!(pricing.total_price, 59.97);
        assert_eq!(pricing.total_tax, 3.0);
        assert_eq!(pricing.price_with_tax, 62.97);
    }

    #[test]
    fn test_price_untaxed_item() {
        let pricing = price_item(10.0, 2, false, 0.05);
        assert_eq!(pricing.total_price, 20.0);
        assert_eq!(pricing.total_tax, 0.0);
        assert_eq!(pricing.price_with_tax, 20.0);
    }
}
