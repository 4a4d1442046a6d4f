use crate::entities::ReviewStatus;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/review/add",
    tag = "review",
    request_body = ReviewCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review stored, waiting for approval", body = ReviewResponse),
        (status = 400, description = "Missing product or rating out of range", body = ErrorResponse)
    )
)]
pub async fn add_review(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    request: web::Json<ReviewCreateRequest>,
) -> Result<HttpResponse> {
    match review_service.add_review(&user, request.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Your review has been added successfully and will appear when approved!",
            "review": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/review",
    tag = "review",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated reviews with author and product"),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match review_service.list_reviews(&user, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page.to_json("reviews"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/review/{slug}",
    tag = "review",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Approved reviews, newest first", body = [ReviewListItem]),
        (status = 404, description = "Unknown product", body = ErrorResponse)
    )
)]
pub async fn product_reviews(
    review_service: web::Data<ReviewService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match review_service.product_reviews(&path.into_inner()).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(json!({ "reviews": reviews }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/review/{id}",
    tag = "review",
    request_body = ReviewUpdate,
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review updated", body = SuccessResponse),
        (status = 404, description = "Unknown review", body = ErrorResponse)
    )
)]
pub async fn update_review(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<ReviewUpdate>,
) -> Result<HttpResponse> {
    match review_service
        .update_review(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "review has been updated successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

async fn moderate(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    review_id: i64,
    status: ReviewStatus,
) -> Result<HttpResponse> {
    match review_service.set_status(&user, review_id, status).await {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "review": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/review/approve/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Review approved", body = ReviewResponse))
)]
pub async fn approve_review(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    moderate(review_service, user, path.into_inner(), ReviewStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/review/reject/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Review rejected", body = ReviewResponse))
)]
pub async fn reject_review(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    moderate(review_service, user, path.into_inner(), ReviewStatus::Rejected).await
}

#[utoipa::path(
    delete,
    path = "/api/review/delete/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Review deleted", body = ReviewResponse))
)]
pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match review_service.delete_review(&user, path.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "review has been deleted successfully!",
            "review": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/review")
            .route("/add", web::post().to(add_review))
            .route("", web::get().to(list_reviews))
            .route("/", web::get().to(list_reviews))
            .route("/approve/{id}", web::put().to(approve_review))
            .route("/reject/{id}", web::put().to(reject_review))
            .route("/delete/{id}", web::delete().to(delete_review))
            .route("/{slug}", web::get().to(product_reviews))
            .route("/{id}", web::put().to(update_review)),
    );
}
