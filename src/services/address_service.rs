use crate::entities::address_entity as addresses;
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 收货地址，只能访问自己的记录
#[derive(Clone)]
pub struct AddressService {
    pool: DatabaseConnection,
}

impl AddressService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn add_address(&self, user: &CurrentUser, request: AddressRequest) -> AppResult<AddressResponse> {
        let is_default = request.is_default.unwrap_or(false);

        let txn = self.pool.begin().await?;
        if is_default {
            clear_default(&txn, user.id).await?;
        }
        let address = addresses::ActiveModel {
            user_id: Set(user.id),
            address: Set(request.address),
            city: Set(request.city),
            state: Set(request.state),
            country: Set(request.country),
            zip_code: Set(request.zip_code),
            is_default: Set(is_default),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(address.into())
    }

    pub async fn list_addresses(&self, user: &CurrentUser) -> AppResult<Vec<AddressResponse>> {
        let rows = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user.id))
            .order_by_desc(addresses::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(AddressResponse::from).collect())
    }

    pub async fn get_address(&self, user: &CurrentUser, address_id: i64) -> AppResult<AddressResponse> {
        Ok(find_owned(&self.pool, user.id, address_id).await?.into())
    }

    pub async fn update_address(
        &self,
        user: &CurrentUser,
        address_id: i64,
        request: AddressRequest,
    ) -> AppResult<AddressResponse> {
        let txn = self.pool.begin().await?;
        let address = find_owned(&txn, user.id, address_id).await?;
        if request.is_default == Some(true) {
            clear_default(&txn, user.id).await?;
        }

        let mut model = address.into_active_model();
        if let Some(v) = request.address {
            model.address = Set(Some(v));
        }
        if let Some(v) = request.city {
            model.city = Set(Some(v));
        }
        if let Some(v) = request.state {
            model.state = Set(Some(v));
        }
        if let Some(v) = request.country {
            model.country = Set(Some(v));
        }
        if let Some(v) = request.zip_code {
            model.zip_code = Set(Some(v));
        }
        if let Some(v) = request.is_default {
            model.is_default = Set(v);
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&txn).await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    pub async fn delete_address(&self, user: &CurrentUser, address_id: i64) -> AppResult<AddressResponse> {
        let address = find_owned(&self.pool, user.id, address_id).await?;
        addresses::Entity::delete_by_id(address.id).exec(&self.pool).await?;
        Ok(address.into())
    }
}

async fn find_owned<C: ConnectionTrait>(conn: &C, user_id: i64, address_id: i64) -> AppResult<addresses::Model> {
    addresses::Entity::find_by_id(address_id)
        .filter(addresses::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("No address found.".to_string()))
}

/// 每个用户最多一个默认地址
async fn clear_default<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<()> {
    addresses::Entity::update_many()
        .col_expr(addresses::Column::IsDefault, Expr::value(false))
        .filter(addresses::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}
