use crate::entities::{
    Role, category_entity as categories, category_product_entity as category_products,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::utils::{resolve_slug, slugify};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone)]
pub struct CategoryService {
    pool: DatabaseConnection,
}

impl CategoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn add_category(
        &self,
        user: &CurrentUser,
        request: CategoryCreateRequest,
    ) -> AppResult<CategoryResponse> {
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

        let txn = self.pool.begin().await?;
        let category = categories::ActiveModel {
            name: Set(Some(name.to_string())),
            slug: Set(slug),
            description: Set(Some(description.to_string())),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let linked = replace_links(&txn, category.id, request.products.unwrap_or_default()).await?;
        txn.commit().await?;

        log::info!("Category created: id={} slug={}", category.id, category.slug);
        Ok(CategoryResponse::new(category, linked))
    }

    pub async fn list_active(&self) -> AppResult<Vec<CategoryResponse>> {
        let rows = categories::Entity::find()
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.pool)
            .await?;
        self.with_links(rows).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<CategoryResponse>> {
        let rows = categories::Entity::find()
            .order_by_desc(categories::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.with_links(rows).await
    }

    pub async fn get_category(&self, category_id: i64) -> AppResult<CategoryResponse> {
        let category = find_category(&self.pool, category_id).await?;
        let mut items = self.with_links(vec![category]).await?;
        items.pop().ok_or_else(category_not_found)
    }

    pub async fn update_category(
        &self,
        user: &CurrentUser,
        category_id: i64,
        update: CategoryUpdate,
    ) -> AppResult<CategoryResponse> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        let category = find_category(&txn, category_id).await?;
        let mut model = category.into_active_model();
        if let Some(slug) = update.slug.as_deref() {
            let slug = slugify(slug);
            if slug.is_empty() {
                return Err(AppError::ValidationError("You must enter a valid slug.".to_string()));
            }
            ensure_slug_free(&txn, &slug, Some(category_id)).await?;
            model.slug = Set(slug);
        }
        if let Some(name) = filled(&update.name) {
            model.name = Set(Some(name.to_string()));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(Utc::now()));
        let category = model.update(&txn).await?;

        let linked = match update.products {
            Some(ids) => replace_links(&txn, category.id, ids).await?,
            None => linked_products(&txn, category.id).await?,
        };
        txn.commit().await?;

        Ok(CategoryResponse::new(category, linked))
    }

    pub async fn set_category_active(
        &self,
        user: &CurrentUser,
        category_id: i64,
        is_active: bool,
    ) -> AppResult<CategoryResponse> {
        user.require_role(&[Role::Admin])?;

        let category = find_category(&self.pool, category_id).await?;
        let mut model = category.into_active_model();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        let category = model.update(&self.pool).await?;

        let linked = linked_products(&self.pool, category.id).await?;
        Ok(CategoryResponse::new(category, linked))
    }

    pub async fn delete_category(&self, user: &CurrentUser, category_id: i64) -> AppResult<u64> {
        user.require_role(&[Role::Admin])?;

        let txn = self.pool.begin().await?;
        category_products::Entity::delete_many()
            .filter(category_products::Column::CategoryId.eq(category_id))
            .exec(&txn)
            .await?;
        let result = categories::Entity::delete_by_id(category_id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected == 0 {
            return Err(category_not_found());
        }
        log::info!("Category deleted: id={}", category_id);
        Ok(result.rows_affected)
    }

    async fn with_links(&self, rows: Vec<categories::Model>) -> AppResult<Vec<CategoryResponse>> {
        let ids: Vec<i64> = rows.iter().map(|c| c.id).collect();
        let links = category_products::Entity::find()
            .filter(category_products::Column::CategoryId.is_in(ids))
            .order_by_asc(category_products::Column::Id)
            .all(&self.pool)
            .await?;

        let mut by_category: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in links {
            by_category
                .entry(link.category_id)
                .or_default()
                .push(link.product_id);
        }

        Ok(rows
            .into_iter()
            .map(|c| {
                let products = by_category.remove(&c.id).unwrap_or_default();
                CategoryResponse::new(c, products)
            })
            .collect())
    }
}

fn category_not_found() -> AppError {
    AppError::NotFound("No Category found.".to_string())
}

async fn find_category<C: ConnectionTrait>(conn: &C, category_id: i64) -> AppResult<categories::Model> {
    categories::Entity::find_by_id(category_id)
        .one(conn)
        .await?
        .ok_or_else(category_not_found)
}

async fn ensure_slug_free<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
    except_id: Option<i64>,
) -> AppResult<()> {
    let mut query = categories::Entity::find().filter(categories::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(categories::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(AppError::DuplicateError("Slug is already in use.".to_string()));
    }
    Ok(())
}

async fn linked_products<C: ConnectionTrait>(conn: &C, category_id: i64) -> AppResult<Vec<i64>> {
    Ok(category_products::Entity::find()
        .filter(category_products::Column::CategoryId.eq(category_id))
        .order_by_asc(category_products::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect())
}

/// 用给定商品整体替换分类关联，忽略不存在的商品 id
async fn replace_links<C: ConnectionTrait>(
    conn: &C,
    category_id: i64,
    product_ids: Vec<i64>,
) -> AppResult<Vec<i64>> {
    category_products::Entity::delete_many()
        .filter(category_products::Column::CategoryId.eq(category_id))
        .exec(conn)
        .await?;

    let wanted: BTreeSet<i64> = product_ids.into_iter().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    let existing: Vec<i64> = products::Entity::find()
        .filter(products::Column::Id.is_in(wanted))
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    for product_id in &existing {
        category_products::ActiveModel {
            category_id: Set(category_id),
            product_id: Set(*product_id),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(existing)
}
