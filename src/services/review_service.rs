use crate::entities::{
    ReviewStatus, Role, product_entity as products, review_entity as reviews,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::CurrentUser;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 5;

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 新评论默认待审核，审核通过后才会公开展示
    pub async fn add_review(
        &self,
        user: &CurrentUser,
        request: ReviewCreateRequest,
    ) -> AppResult<ReviewResponse> {
        let Some(product_id) = request.product else {
            return Err(AppError::ValidationError("You must select a product.".to_string()));
        };
        let rating = request.rating.unwrap_or(MIN_RATING);
        validate_rating(rating)?;

        products::Entity::find_by_id(product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No product found.".to_string()))?;

        let review = reviews::ActiveModel {
            product_id: Set(Some(product_id)),
            user_id: Set(Some(user.id)),
            title: Set(request.title),
            rating: Set(rating),
            review: Set(request.review),
            is_recommended: Set(request.is_recommended.unwrap_or(true)),
            status: Set(ReviewStatus::WaitingApproval),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Review {} added for product {}", review.id, product_id);
        Ok(review.into())
    }

    pub async fn list_reviews(
        &self,
        user: &CurrentUser,
        params: &PaginationParams,
    ) -> AppResult<Paginated<ReviewListItem>> {
        user.require_role(&[Role::Admin])?;

        let count = reviews::Entity::find().count(&self.pool).await?;
        let rows = reviews::Entity::find()
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        let user_ids: Vec<i64> = rows.iter().filter_map(|r| r.user_id).collect();
        let product_ids: Vec<i64> = rows.iter().filter_map(|r| r.product_id).collect();

        let authors: HashMap<i64, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let items: HashMap<i64, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let list = rows
            .into_iter()
            .map(|review| ReviewListItem {
                user: review
                    .user_id
                    .and_then(|id| authors.get(&id))
                    .map(|u| ReviewAuthor {
                        first_name: u.first_name.clone(),
                    }),
                product: review
                    .product_id
                    .and_then(|id| items.get(&id))
                    .map(|p| ReviewProduct {
                        name: p.name.clone(),
                        slug: p.slug.clone(),
                        image_url: p.image_url.clone(),
                    }),
                review: review.into(),
            })
            .collect();

        Ok(Paginated::new(list, PageMeta::new(params, count)))
    }

    /// 商品已审核通过的评论，新的在前
    pub async fn product_reviews(&self, slug: &str) -> AppResult<Vec<ReviewListItem>> {
        let product = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No product found.".to_string()))?;

        let rows = reviews::Entity::find()
            .filter(reviews::Column::ProductId.eq(product.id))
            .filter(reviews::Column::Status.eq(ReviewStatus::Approved))
            .find_also_related(users::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, author)| ReviewListItem {
                review: review.into(),
                user: author.map(|u| ReviewAuthor {
                    first_name: u.first_name,
                }),
                product: Some(ReviewProduct {
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    image_url: product.image_url.clone(),
                }),
            })
            .collect())
    }

    /// 作者本人或管理员可修改
    pub async fn update_review(
        &self,
        user: &CurrentUser,
        review_id: i64,
        update: ReviewUpdate,
    ) -> AppResult<ReviewResponse> {
        let review = self.find_owned(user, review_id).await?;

        let mut model = review.into_active_model();
        if let Some(rating) = update.rating {
            validate_rating(rating)?;
            model.rating = Set(rating);
        }
        if let Some(title) = update.title {
            model.title = Set(Some(title));
        }
        if let Some(text) = update.review {
            model.review = Set(Some(text));
        }
        if let Some(is_recommended) = update.is_recommended {
            model.is_recommended = Set(is_recommended);
        }
        model.updated_at = Set(Some(Utc::now()));

        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn set_status(
        &self,
        user: &CurrentUser,
        review_id: i64,
        status: ReviewStatus,
    ) -> AppResult<ReviewResponse> {
        user.require_role(&[Role::Admin])?;

        let review = find_review(&self.pool, review_id).await?;
        let mut model = review.into_active_model();
        model.status = Set(status);
        model.updated_at = Set(Some(Utc::now()));
        let review = model.update(&self.pool).await?;

        log::info!("Review {} moderated: {}", review_id, status);
        Ok(review.into())
    }

    pub async fn delete_review(&self, user: &CurrentUser, review_id: i64) -> AppResult<ReviewResponse> {
        let review = self.find_owned(user, review_id).await?;
        reviews::Entity::delete_by_id(review.id).exec(&self.pool).await?;
        Ok(review.into())
    }

    async fn find_owned(&self, user: &CurrentUser, review_id: i64) -> AppResult<reviews::Model> {
        let review = find_review(&self.pool, review_id).await?;
        if user.is_admin() || review.user_id == Some(user.id) {
            Ok(review)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

async fn find_review(pool: &DatabaseConnection, review_id: i64) -> AppResult<reviews::Model> {
    reviews::Entity::find_by_id(review_id)
        .one(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No review found.".to_string()))
}

pub fn validate_rating(rating: i32) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(0).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-1).is_err());
    }
}
