use crate::entities::{product_entity as products, wishlist_entity as wishlists};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct WishlistService {
    pool: DatabaseConnection,
}

impl WishlistService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 每个用户对同一商品只保留一条记录
    pub async fn upsert(&self, user: &CurrentUser, request: WishlistRequest) -> AppResult<WishlistResponse> {
        products::Entity::find_by_id(request.product)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No product found.".to_string()))?;

        let existing = wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user.id))
            .filter(wishlists::Column::ProductId.eq(request.product))
            .one(&self.pool)
            .await?;

        let saved = match existing {
            Some(row) => {
                let mut model = row.into_active_model();
                model.is_liked = Set(request.is_liked);
                model.updated_at = Set(Some(Utc::now()));
                model.update(&self.pool).await?
            }
            None => {
                wishlists::ActiveModel {
                    product_id: Set(request.product),
                    user_id: Set(user.id),
                    is_liked: Set(request.is_liked),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(saved.into())
    }

    pub async fn liked(&self, user: &CurrentUser) -> AppResult<Vec<WishlistItem>> {
        let rows = wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user.id))
            .filter(wishlists::Column::IsLiked.eq(true))
            .find_also_related(products::Entity)
            .order_by_desc(wishlists::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(wishlist, product)| WishlistItem {
                wishlist: wishlist.into(),
                product: product.map(ProductSearchItem::from),
            })
            .collect())
    }
}
