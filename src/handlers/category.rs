use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::CategoryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/category/add",
    tag = "category",
    request_body = CategoryCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Missing field or slug in use", body = ErrorResponse)
    )
)]
pub async fn add_category(
    category_service: web::Data<CategoryService>,
    user: CurrentUser,
    request: web::Json<CategoryCreateRequest>,
) -> Result<HttpResponse> {
    match category_service.add_category(&user, request.into_inner()).await {
        Ok(category) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Category has been added successfully!",
            "category": category
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/category/list",
    tag = "category",
    responses((status = 200, description = "Active categories", body = [CategoryResponse]))
)]
pub async fn list_active(category_service: web::Data<CategoryService>) -> Result<HttpResponse> {
    match category_service.list_active().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({ "categories": categories }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/category",
    tag = "category",
    responses((status = 200, description = "All categories", body = [CategoryResponse]))
)]
pub async fn list_all(category_service: web::Data<CategoryService>) -> Result<HttpResponse> {
    match category_service.list_all().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({ "categories": categories }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/category/{id}",
    tag = "category",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn get_category(
    category_service: web::Data<CategoryService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match category_service.get_category(path.into_inner()).await {
        Ok(category) => Ok(HttpResponse::Ok().json(json!({ "category": category }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/category/{id}",
    tag = "category",
    request_body = CategoryUpdateBody,
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Category updated", body = SuccessResponse))
)]
pub async fn update_category(
    category_service: web::Data<CategoryService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<CategoryUpdateBody>,
) -> Result<HttpResponse> {
    match category_service
        .update_category(&user, path.into_inner(), body.into_inner().category)
        .await
    {
        Ok(category) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Category has been updated successfully!",
            "category": category
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/category/{id}/active",
    tag = "category",
    request_body = CategoryActiveBody,
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Category updated", body = SuccessResponse))
)]
pub async fn set_category_active(
    category_service: web::Data<CategoryService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<CategoryActiveBody>,
) -> Result<HttpResponse> {
    let is_active = body.category.is_active;
    match category_service
        .set_category_active(&user, path.into_inner(), is_active)
        .await
    {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Category has been updated successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/category/delete/{id}",
    tag = "category",
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category deleted", body = SuccessResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    category_service: web::Data<CategoryService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match category_service.delete_category(&user, path.into_inner()).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Category has been deleted successfully!",
            "category": deleted
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn category_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/category")
            .route("/add", web::post().to(add_category))
            .route("/list", web::get().to(list_active))
            .route("", web::get().to(list_all))
            .route("/", web::get().to(list_all))
            .route("/delete/{id}", web::delete().to(delete_category))
            .route("/{id}/active", web::put().to(set_category_active))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category)),
    );
}
