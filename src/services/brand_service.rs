use crate::entities::{
    MerchantStatus, Role, brand_entity as brands, merchant_entity as merchants,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::Scope;
use crate::utils::{resolve_slug, slugify};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct BrandService {
    pool: DatabaseConnection,
}

impl BrandService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 管理员新增品牌
    pub async fn add_brand(
        &self,
        user: &CurrentUser,
        request: BrandCreateRequest,
    ) -> AppResult<BrandResponse> {
        user.require_role(&[Role::Admin])?;

        let (Some(name), Some(description)) = (filled(&request.name), filled(&request.description))
        else {
            return Err(AppError::ValidationError(
                "You must enter description & name.".to_string(),
            ));
        };

        let slug = resolve_slug(request.slug.as_deref(), name)
            .ok_or_else(|| AppError::ValidationError("You must enter a valid name.".to_string()))?;
        ensure_slug_free(&self.pool, &slug, None).await?;

        let brand = brands::ActiveModel {
            name: Set(Some(name.to_string())),
            slug: Set(slug),
            description: Set(Some(description.to_string())),
            is_active: Set(request.is_active.unwrap_or(true)),
            merchant_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Brand created: id={} slug={}", brand.id, brand.slug);
        Ok(brand.into())
    }

    /// 公开列表：仅启用的品牌，附带商家名称
    pub async fn list_active(&self) -> AppResult<Vec<BrandListItem>> {
        let rows = brands::Entity::find()
            .filter(brands::Column::IsActive.eq(true))
            .find_also_related(merchants::Entity)
            .order_by_asc(brands::Column::Name)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(brand, merchant)| BrandListItem {
                brand: brand.into(),
                merchant: merchant.map(|m| MerchantName { name: m.name }),
            })
            .collect())
    }

    pub async fn list_brands(&self, user: &CurrentUser) -> AppResult<Vec<BrandResponse>> {
        user.require_role(&[Role::Admin, Role::Merchant])?;

        let rows = brands::Entity::find()
            .filter(Scope::for_user(user).brand_condition())
            .order_by_desc(brands::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BrandResponse::from).collect())
    }

    /// 下拉选择用：只返回 id 与名称
    pub async fn list_select(&self, user: &CurrentUser) -> AppResult<Vec<NameOnly>> {
        user.require_role(&[Role::Admin, Role::Merchant])?;

        let rows = brands::Entity::find()
            .filter(Scope::for_user(user).brand_condition())
            .order_by_asc(brands::Column::Name)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|b| NameOnly {
                id: b.id,
                name: b.name.unwrap_or_default(),
            })
            .collect())
    }

    pub async fn get_brand(&self, brand_id: i64) -> AppResult<BrandResponse> {
        brands::Entity::find_by_id(brand_id)
            .one(&self.pool)
            .await?
            .map(BrandResponse::from)
            .ok_or_else(|| brand_not_found(brand_id))
    }

    pub async fn update_brand(
        &self,
        user: &CurrentUser,
        brand_id: i64,
        update: BrandUpdate,
    ) -> AppResult<BrandResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;
        let brand = self.find_scoped(user, brand_id).await?;

        let txn = self.pool.begin().await?;
        let mut model = brand.into_active_model();
        if let Some(slug) = update.slug.as_deref() {
            let slug = slugify(slug);
            if slug.is_empty() {
                return Err(AppError::ValidationError("You must enter a valid slug.".to_string()));
            }
            ensure_slug_free(&txn, &slug, Some(brand_id)).await?;
            model.slug = Set(slug);
        }
        if let Some(name) = filled(&update.name) {
            model.name = Set(Some(name.to_string()));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = update.is_active {
            // 停用与 `/:id/active` 一样连带停用商品
            if !is_active {
                deactivate_brand_products(&txn, brand_id).await?;
            }
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(&txn).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    /// 停用品牌时同一事务内停用其全部商品
    pub async fn set_brand_active(
        &self,
        user: &CurrentUser,
        brand_id: i64,
        is_active: bool,
    ) -> AppResult<BrandResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;
        let brand = self.find_scoped(user, brand_id).await?;

        let txn = self.pool.begin().await?;
        if !is_active {
            deactivate_brand_products(&txn, brand.id).await?;
        }
        let mut model = brand.into_active_model();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&txn).await?;
        txn.commit().await?;

        log::info!("Brand {} active set to {}", brand_id, is_active);
        Ok(updated.into())
    }

    /// 删除品牌并把关联商家重置为待审核
    pub async fn delete_brand(&self, user: &CurrentUser, brand_id: i64) -> AppResult<BrandResponse> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        let brand = brands::Entity::find_by_id(brand_id)
            .one(&txn)
            .await?
            .ok_or_else(|| brand_not_found(brand_id))?;

        let mut linked = Condition::any().add(merchants::Column::BrandId.eq(brand.id));
        if let Some(merchant_id) = brand.merchant_id {
            linked = linked.add(merchants::Column::Id.eq(merchant_id));
        }
        merchants::Entity::update_many()
            .col_expr(
                merchants::Column::Status,
                Expr::value(MerchantStatus::WaitingApproval.to_string()),
            )
            .col_expr(merchants::Column::IsActive, Expr::value(false))
            .col_expr(merchants::Column::BrandId, Expr::value(Option::<i64>::None))
            .col_expr(merchants::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(linked)
            .exec(&txn)
            .await?;

        brands::Entity::delete_by_id(brand.id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Brand deleted: id={}", brand_id);
        Ok(brand.into())
    }

    async fn find_scoped(&self, user: &CurrentUser, brand_id: i64) -> AppResult<brands::Model> {
        brands::Entity::find_by_id(brand_id)
            .filter(Scope::for_user(user).brand_condition())
            .one(&self.pool)
            .await?
            .ok_or_else(|| brand_not_found(brand_id))
    }
}

fn brand_not_found(brand_id: i64) -> AppError {
    AppError::NotFound(format!("Cannot find brand with the id: {brand_id}."))
}

async fn ensure_slug_free<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
    except_id: Option<i64>,
) -> AppResult<()> {
    let mut query = brands::Entity::find().filter(brands::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(brands::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(AppError::DuplicateError("Slug is already in use.".to_string()));
    }
    Ok(())
}

/// 停用品牌下的全部商品
pub async fn deactivate_brand_products<C: ConnectionTrait>(conn: &C, brand_id: i64) -> AppResult<u64> {
    let result = products::Entity::update_many()
        .col_expr(products::Column::IsActive, Expr::value(false))
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::BrandId.eq(brand_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// 停用商家名下的品牌及其商品；没有品牌时什么都不做
pub async fn deactivate_merchant_brands<C: ConnectionTrait>(
    conn: &C,
    merchant_id: i64,
) -> AppResult<()> {
    let owned = brands::Entity::find()
        .filter(brands::Column::MerchantId.eq(merchant_id))
        .all(conn)
        .await?;

    for brand in owned {
        deactivate_brand_products(conn, brand.id).await?;
        let brand_id = brand.id;
        let mut model = brand.into_active_model();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(conn).await?;
        log::info!("Brand {} deactivated with merchant {}", brand_id, merchant_id);
    }
    Ok(())
}

/// 确保商家拥有且只拥有一个品牌，并维护双向关联；重复调用复用已有品牌
pub async fn ensure_merchant_brand<C: ConnectionTrait>(
    conn: &C,
    merchant: &merchants::Model,
) -> AppResult<brands::Model> {
    let existing = brands::Entity::find()
        .filter(brands::Column::MerchantId.eq(merchant.id))
        .order_by_asc(brands::Column::Id)
        .one(conn)
        .await?;

    let brand = match existing {
        Some(brand) => brand,
        None => {
            let name = filled(&merchant.brand_name)
                .or(filled(&merchant.name))
                .map(str::to_string);
            let slug = available_brand_slug(conn, name.as_deref(), merchant.id).await?;

            let brand = brands::ActiveModel {
                name: Set(name),
                slug: Set(slug),
                description: Set(Some(merchant.business.clone())),
                is_active: Set(false),
                merchant_id: Set(Some(merchant.id)),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            log::info!("Brand {} provisioned for merchant {}", brand.id, merchant.id);
            brand
        }
    };

    if merchant.brand_id != Some(brand.id) {
        let mut model = merchant.clone().into_active_model();
        model.brand_id = Set(Some(brand.id));
        model.updated_at = Set(Some(Utc::now()));
        model.update(conn).await?;
    }

    Ok(brand)
}

async fn available_brand_slug<C: ConnectionTrait>(
    conn: &C,
    name: Option<&str>,
    merchant_id: i64,
) -> AppResult<String> {
    let base = name.map(slugify).filter(|s| !s.is_empty());
    let Some(base) = base else {
        return Ok(format!("brand-{merchant_id}"));
    };

    let taken = brands::Entity::find()
        .filter(brands::Column::Slug.eq(base.as_str()))
        .one(conn)
        .await?
        .is_some();
    if taken {
        Ok(format!("{base}-{merchant_id}"))
    } else {
        Ok(base)
    }
}
