use crate::entities::{cart_entity as carts, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 下单：购物车必须属于当前用户
    pub async fn add_order(&self, user: &CurrentUser, request: OrderAddRequest) -> AppResult<OrderResponse> {
        if !request.total.is_finite() || request.total < 0.0 {
            return Err(AppError::ValidationError("Order total is invalid.".to_string()));
        }

        let cart = carts::Entity::find_by_id(request.cart_id)
            .filter(carts::Column::UserId.eq(user.id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No cart found.".to_string()))?;

        let order = orders::ActiveModel {
            cart_id: Set(cart.id),
            user_id: Set(user.id),
            total: Set(request.total),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Order {} placed by user {}", order.id, user.id);
        Ok(order.into())
    }

    pub async fn my_orders(
        &self,
        user: &CurrentUser,
        params: &PaginationParams,
    ) -> AppResult<Paginated<OrderResponse>> {
        let count = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user.id))
            .count(&self.pool)
            .await?;
        let rows = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user.id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(OrderResponse::from).collect(),
            PageMeta::new(params, count),
        ))
    }
}
