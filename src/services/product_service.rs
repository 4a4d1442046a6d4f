use crate::entities::{
    ReviewStatus, Role, brand_entity as brands, category_entity as categories,
    category_product_entity as category_products, product_entity as products,
    review_entity as reviews, wishlist_entity as wishlists,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::Scope;
use crate::utils::{resolve_slug, slugify};
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
}

/// 单个商品的评分汇总
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub total: u64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        Self {
            average: sum as f64 / ratings.len() as f64,
            total: ratings.len() as u64,
        }
    }
}

/// 目录分页：总数不超过每页数量时始终返回第一页
pub fn catalog_window(count: u64, page: u64, limit: u64) -> (u64, PageMeta) {
    let page = page.max(1);
    let limit = limit.max(1);
    let (offset, current_page) = if count > limit {
        (page_offset(page, limit), page)
    } else {
        (0, 1)
    };
    (
        offset,
        PageMeta {
            total_pages: count.div_ceil(limit),
            current_page,
            count,
        },
    )
}

impl ProductService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 商品详情：商品与品牌都必须处于启用状态
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<ProductWithBrand> {
        let row = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .filter(products::Column::IsActive.eq(true))
            .find_also_related(brands::Entity)
            .one(&self.pool)
            .await?;

        match row {
            Some((product, Some(brand))) if brand.is_active => Ok(ProductWithBrand {
                product: product.into(),
                brand: Some(brand.into()),
            }),
            _ => Err(product_not_found()),
        }
    }

    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<ProductSearchItem>> {
        let rows = products::Entity::find()
            .filter(products::Column::Name.contains(name.trim()))
            .filter(products::Column::IsActive.eq(true))
            .order_by_asc(products::Column::Name)
            .all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(product_not_found());
        }
        Ok(rows.into_iter().map(ProductSearchItem::from).collect())
    }

    /// 店面商品目录：筛选、评分汇总、排序与分页
    pub async fn catalog(
        &self,
        query: &CatalogQuery,
        viewer: Option<&CurrentUser>,
    ) -> AppResult<Paginated<CatalogItem>> {
        let sort = CatalogSort::parse(query.sort_order.as_deref())?;

        let mut select = products::Entity::find()
            .filter(products::Column::IsActive.eq(true))
            .find_also_related(brands::Entity)
            .filter(brands::Column::IsActive.eq(true));

        if let Some(min) = query.min {
            select = select.filter(products::Column::Price.gte(min));
        }
        if let Some(max) = query.max {
            select = select.filter(products::Column::Price.lte(max));
        }

        // 分类与品牌只在存在且启用时才参与筛选
        if let Some(slug) = query.category.as_deref().filter(|s| !s.is_empty()) {
            let category = categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .filter(categories::Column::IsActive.eq(true))
                .one(&self.pool)
                .await?;
            if let Some(category) = category {
                select = select.filter(
                    products::Column::Id.in_subquery(
                        Query::select()
                            .column(category_products::Column::ProductId)
                            .from(category_products::Entity)
                            .and_where(category_products::Column::CategoryId.eq(category.id))
                            .to_owned(),
                    ),
                );
            }
        }
        if let Some(slug) = query.brand.as_deref().filter(|s| !s.is_empty()) {
            let brand = brands::Entity::find()
                .filter(brands::Column::Slug.eq(slug))
                .filter(brands::Column::IsActive.eq(true))
                .one(&self.pool)
                .await?;
            if let Some(brand) = brand {
                select = select.filter(products::Column::BrandId.eq(brand.id));
            }
        }

        let rows = select.all(&self.pool).await?;
        let ids: Vec<i64> = rows.iter().map(|(p, _)| p.id).collect();
        let ratings = self.approved_ratings(&ids).await?;

        let mut items: Vec<(products::Model, Option<brands::Model>, RatingSummary)> = rows
            .into_iter()
            .map(|(product, brand)| {
                let summary = ratings.get(&product.id).copied().unwrap_or_default();
                (product, brand, summary)
            })
            .filter(|(_, _, summary)| query.rating.is_none_or(|min| summary.average >= min))
            .collect();

        items.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::Created => a.0.created_at.cmp(&b.0.created_at),
                SortField::Price => a.0.price.partial_cmp(&b.0.price).unwrap_or(Ordering::Equal),
                SortField::Name => a.0.name.cmp(&b.0.name),
                SortField::AverageRating => a
                    .2
                    .average
                    .partial_cmp(&b.2.average)
                    .unwrap_or(Ordering::Equal),
            }
            .then_with(|| a.0.id.cmp(&b.0.id));
            if sort.ascending { ordering } else { ordering.reverse() }
        });

        let params = PaginationParams::new(query.page, query.limit);
        let (offset, meta) = catalog_window(items.len() as u64, params.page(), params.limit());
        let page: Vec<_> = items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(params.limit() as usize)
            .collect();

        let liked = match viewer {
            Some(user) => {
                let page_ids: Vec<i64> = page.iter().map(|(p, _, _)| p.id).collect();
                Some(self.liked_products(user.id, &page_ids).await?)
            }
            None => None,
        };

        let items = page
            .into_iter()
            .map(|(product, brand, summary)| CatalogItem {
                is_liked: liked.as_ref().map(|set| set.contains(&product.id)),
                product: product.into(),
                brand: brand.map(BrandSummary::from),
                average_rating: summary.average,
                total_reviews: summary.total,
            })
            .collect();

        Ok(Paginated::new(items, meta))
    }

    /// 下拉选择用商品名称
    pub async fn list_select(&self, _user: &CurrentUser) -> AppResult<Vec<NameOnly>> {
        let rows = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|p| NameOnly { id: p.id, name: p.name })
            .collect())
    }

    pub async fn add_product(
        &self,
        user: &CurrentUser,
        request: ProductCreateRequest,
    ) -> AppResult<ProductResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;

        let Some(sku) = filled(&request.sku) else {
            return Err(AppError::ValidationError("You must enter sku.".to_string()));
        };
        let (Some(name), Some(description)) = (filled(&request.name), filled(&request.description))
        else {
            return Err(AppError::ValidationError(
                "You must enter description & name.".to_string(),
            ));
        };
        let Some(quantity) = request.quantity.filter(|q| *q > 0) else {
            return Err(AppError::ValidationError("You must enter a quantity.".to_string()));
        };
        let Some(price) = request.price.filter(|p| *p > 0.0) else {
            return Err(AppError::ValidationError("You must enter a price.".to_string()));
        };

        let sku_taken = products::Entity::find()
            .filter(products::Column::Sku.eq(sku))
            .one(&self.pool)
            .await?
            .is_some();
        if sku_taken {
            return Err(AppError::DuplicateError("This sku is already in use.".to_string()));
        }

        let slug = self.new_product_slug(request.slug.as_deref(), name, sku).await?;
        let brand_id = self.brand_for_new_product(user, request.brand).await?;

        let product = products::ActiveModel {
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            slug: Set(slug),
            image_url: Set(request.image_url),
            image_key: Set(request.image_key),
            description: Set(Some(description.to_string())),
            quantity: Set(quantity),
            price: Set(price),
            taxable: Set(request.taxable.unwrap_or(false)),
            is_active: Set(request.is_active.unwrap_or(true)),
            brand_id: Set(brand_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Product created: id={} sku={}", product.id, product.sku);
        Ok(product.into())
    }

    pub async fn list_products(&self, user: &CurrentUser) -> AppResult<Vec<ProductWithBrand>> {
        user.require_role(&[Role::Admin, Role::Merchant])?;

        let rows = products::Entity::find()
            .filter(Scope::for_user(user).product_condition())
            .find_also_related(brands::Entity)
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, brand)| ProductWithBrand {
                product: product.into(),
                brand: brand.map(BrandSummary::from),
            })
            .collect())
    }

    pub async fn get_product(&self, user: &CurrentUser, product_id: i64) -> AppResult<ProductWithBrand> {
        user.require_role(&[Role::Admin, Role::Merchant])?;

        let (product, brand) = products::Entity::find_by_id(product_id)
            .filter(Scope::for_user(user).product_condition())
            .find_also_related(brands::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(product_not_found)?;

        Ok(ProductWithBrand {
            product: product.into(),
            brand: brand.map(BrandSummary::from),
        })
    }

    pub async fn update_product(
        &self,
        user: &CurrentUser,
        product_id: i64,
        update: ProductUpdate,
    ) -> AppResult<ProductResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;
        let product = self.find_scoped(user, product_id).await?;

        let sku = update.sku.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let slug = update.slug.as_deref().map(slugify).filter(|s| !s.is_empty());
        if sku.is_some() || slug.is_some() {
            let mut clash = Condition::any();
            if let Some(sku) = sku {
                clash = clash.add(products::Column::Sku.eq(sku));
            }
            if let Some(slug) = slug.as_deref() {
                clash = clash.add(products::Column::Slug.eq(slug));
            }
            let found = products::Entity::find()
                .filter(clash)
                .filter(products::Column::Id.ne(product_id))
                .one(&self.pool)
                .await?;
            if found.is_some() {
                return Err(AppError::DuplicateError(
                    "Sku or slug is already in use.".to_string(),
                ));
            }
        }

        let mut model = product.into_active_model();
        if let Some(sku) = sku {
            model.sku = Set(sku.to_string());
        }
        if let Some(slug) = slug {
            model.slug = Set(slug);
        }
        if let Some(name) = filled(&update.name) {
            model.name = Set(name.to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(quantity) = update.quantity {
            model.quantity = Set(quantity);
        }
        if let Some(price) = update.price {
            model.price = Set(price);
        }
        if let Some(taxable) = update.taxable {
            model.taxable = Set(taxable);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(image_url) = update.image_url {
            model.image_url = Set(Some(image_url));
        }
        if let Some(image_key) = update.image_key {
            model.image_key = Set(Some(image_key));
        }
        // 商家不能把商品移到别的品牌
        if let (Some(brand_id), true) = (update.brand, user.is_admin()) {
            self.require_brand(brand_id).await?;
            model.brand_id = Set(Some(brand_id));
        }
        model.updated_at = Set(Some(Utc::now()));

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn set_product_active(
        &self,
        user: &CurrentUser,
        product_id: i64,
        is_active: bool,
    ) -> AppResult<ProductResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;
        let product = self.find_scoped(user, product_id).await?;

        let mut model = product.into_active_model();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn delete_product(&self, user: &CurrentUser, product_id: i64) -> AppResult<ProductResponse> {
        user.require_role(&[Role::Admin, Role::Merchant])?;
        let product = self.find_scoped(user, product_id).await?;

        let txn = self.pool.begin().await?;
        category_products::Entity::delete_many()
            .filter(category_products::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        wishlists::Entity::delete_many()
            .filter(wishlists::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        products::Entity::delete_by_id(product.id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Product deleted: id={}", product_id);
        Ok(product.into())
    }

    async fn find_scoped(&self, user: &CurrentUser, product_id: i64) -> AppResult<products::Model> {
        products::Entity::find_by_id(product_id)
            .filter(Scope::for_user(user).product_condition())
            .one(&self.pool)
            .await?
            .ok_or_else(product_not_found)
    }

    async fn require_brand(&self, brand_id: i64) -> AppResult<brands::Model> {
        brands::Entity::find_by_id(brand_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cannot find brand with the id: {brand_id}.")))
    }

    /// 商家的商品始终挂在自己的品牌下
    async fn brand_for_new_product(
        &self,
        user: &CurrentUser,
        requested: Option<i64>,
    ) -> AppResult<Option<i64>> {
        match Scope::for_user(user) {
            Scope::All => match requested {
                Some(brand_id) => Ok(Some(self.require_brand(brand_id).await?.id)),
                None => Ok(None),
            },
            scope @ Scope::Merchant(_) => {
                let brand = brands::Entity::find()
                    .filter(scope.brand_condition())
                    .order_by_asc(brands::Column::Id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "Your merchant account has no brand yet.".to_string(),
                        )
                    })?;
                Ok(Some(brand.id))
            }
            Scope::Nothing => Err(AppError::Forbidden),
        }
    }

    /// 显式指定的 slug 冲突时报错；由名称生成的 slug 冲突时追加 sku
    async fn new_product_slug(&self, explicit: Option<&str>, name: &str, sku: &str) -> AppResult<String> {
        let explicit_given = explicit.is_some_and(|s| !s.trim().is_empty());
        let slug = resolve_slug(explicit, name)
            .ok_or_else(|| AppError::ValidationError("You must enter a valid name.".to_string()))?;

        if !self.slug_taken(&slug).await? {
            return Ok(slug);
        }
        if explicit_given {
            return Err(AppError::DuplicateError("Slug is already in use.".to_string()));
        }
        let fallback = format!("{slug}-{}", slugify(sku));
        if self.slug_taken(&fallback).await? {
            return Err(AppError::DuplicateError("Slug is already in use.".to_string()));
        }
        Ok(fallback)
    }

    async fn slug_taken(&self, slug: &str) -> AppResult<bool> {
        Ok(products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .one(&self.pool)
            .await?
            .is_some())
    }

    async fn approved_ratings(&self, product_ids: &[i64]) -> AppResult<HashMap<i64, RatingSummary>> {
        let rows = reviews::Entity::find()
            .filter(reviews::Column::ProductId.is_in(product_ids.iter().copied()))
            .filter(reviews::Column::Status.eq(ReviewStatus::Approved))
            .all(&self.pool)
            .await?;

        let mut grouped: HashMap<i64, Vec<i32>> = HashMap::new();
        for review in rows {
            if let Some(product_id) = review.product_id {
                grouped.entry(product_id).or_default().push(review.rating);
            }
        }
        Ok(grouped
            .into_iter()
            .map(|(id, ratings)| (id, RatingSummary::from_ratings(&ratings)))
            .collect())
    }

    async fn liked_products(&self, user_id: i64, product_ids: &[i64]) -> AppResult<HashSet<i64>> {
        Ok(wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user_id))
            .filter(wishlists::Column::IsLiked.eq(true))
            .filter(wishlists::Column::ProductId.is_in(product_ids.iter().copied()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|w| w.product_id)
            .collect())
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("No product found.".to_string())
}
