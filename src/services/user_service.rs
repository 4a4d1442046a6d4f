use crate::entities::{
    Role, brand_entity as brands, merchant_entity as merchants, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn search_users(&self, user: &CurrentUser, term: &str) -> AppResult<Vec<UserResponse>> {
        user.require_role(&[Role::Admin])?;
        let term = term.trim();

        let rows = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::FirstName.contains(term))
                    .add(users::Column::LastName.contains(term))
                    .add(users::Column::Email.contains(term)),
            )
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserResponse::from).collect())
    }

    pub async fn list_users(
        &self,
        user: &CurrentUser,
        params: &PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        user.require_role(&[Role::Admin])?;

        let count = users::Entity::find().count(&self.pool).await?;
        let rows = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(UserResponse::from).collect(),
            PageMeta::new(params, count),
        ))
    }

    /// 当前用户资料，附带所属商家与品牌
    pub async fn get_profile(&self, user: &CurrentUser) -> AppResult<UserProfileResponse> {
        let (model, merchant) = users::Entity::find_by_id(user.id)
            .find_also_related(merchants::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let brand = match &merchant {
            Some(m) => {
                brands::Entity::find()
                    .filter(brands::Column::MerchantId.eq(m.id))
                    .order_by_asc(brands::Column::Id)
                    .one(&self.pool)
                    .await?
            }
            None => None,
        };

        Ok(UserProfileResponse {
            user: model.into(),
            merchant: merchant.map(MerchantResponse::from),
            brand: brand.map(BrandResponse::from),
        })
    }

    /// 只允许修改姓名、电话与头像
    pub async fn update_profile(
        &self,
        user: &CurrentUser,
        update: ProfileUpdate,
    ) -> AppResult<UserResponse> {
        let model = users::Entity::find_by_id(user.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut model = model.into_active_model();
        if let Some(first_name) = filled(&update.first_name) {
            model.first_name = Set(Some(first_name.to_string()));
        }
        if let Some(last_name) = filled(&update.last_name) {
            model.last_name = Set(Some(last_name.to_string()));
        }
        if let Some(phone_number) = update.phone_number {
            model.phone_number = Set(Some(phone_number));
        }
        if let Some(avatar) = update.avatar {
            model.avatar = Set(Some(avatar));
        }
        model.updated_at = Set(Some(Utc::now()));

        Ok(model.update(&self.pool).await?.into())
    }
}
