use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::BrandService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/brand/add",
    tag = "brand",
    request_body = BrandCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Brand created", body = BrandResponse),
        (status = 400, description = "Missing field or slug in use", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn add_brand(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
    request: web::Json<BrandCreateRequest>,
) -> Result<HttpResponse> {
    match brand_service.add_brand(&user, request.into_inner()).await {
        Ok(brand) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Brand has been added successfully!",
            "brand": brand
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/brand/list",
    tag = "brand",
    responses((status = 200, description = "Active brands", body = [BrandListItem]))
)]
pub async fn list_active(brand_service: web::Data<BrandService>) -> Result<HttpResponse> {
    match brand_service.list_active().await {
        Ok(brands) => Ok(HttpResponse::Ok().json(json!({ "brands": brands }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/brand",
    tag = "brand",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Brands visible to the caller", body = [BrandResponse]))
)]
pub async fn list_brands(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match brand_service.list_brands(&user).await {
        Ok(brands) => Ok(HttpResponse::Ok().json(json!({ "brands": brands }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/brand/list/select",
    tag = "brand",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Brand names", body = [NameOnly]))
)]
pub async fn list_select(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match brand_service.list_select(&user).await {
        Ok(brands) => Ok(HttpResponse::Ok().json(json!({ "brands": brands }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/brand/{id}",
    tag = "brand",
    params(("id" = i64, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand", body = BrandResponse),
        (status = 404, description = "Unknown brand", body = ErrorResponse)
    )
)]
pub async fn get_brand(
    brand_service: web::Data<BrandService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match brand_service.get_brand(path.into_inner()).await {
        Ok(brand) => Ok(HttpResponse::Ok().json(json!({ "brand": brand }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/brand/{id}",
    tag = "brand",
    request_body = BrandUpdateBody,
    params(("id" = i64, Path, description = "Brand id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Brand updated", body = SuccessResponse),
        (status = 400, description = "Slug in use", body = ErrorResponse)
    )
)]
pub async fn update_brand(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<BrandUpdateBody>,
) -> Result<HttpResponse> {
    match brand_service
        .update_brand(&user, path.into_inner(), body.into_inner().brand)
        .await
    {
        Ok(brand) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Brand has been updated successfully!",
            "brand": brand
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/brand/{id}/active",
    tag = "brand",
    request_body = BrandActiveBody,
    params(("id" = i64, Path, description = "Brand id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Brand updated", body = SuccessResponse))
)]
pub async fn set_brand_active(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<BrandActiveBody>,
) -> Result<HttpResponse> {
    let is_active = body.brand.is_active;
    match brand_service
        .set_brand_active(&user, path.into_inner(), is_active)
        .await
    {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Brand has been updated successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/brand/delete/{id}",
    tag = "brand",
    params(("id" = i64, Path, description = "Brand id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Brand deleted", body = BrandResponse),
        (status = 404, description = "Unknown brand", body = ErrorResponse)
    )
)]
pub async fn delete_brand(
    brand_service: web::Data<BrandService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match brand_service.delete_brand(&user, path.into_inner()).await {
        Ok(brand) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Brand has been deleted successfully!",
            "brand": brand
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn brand_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/brand")
            .route("/add", web::post().to(add_brand))
            .route("/list", web::get().to(list_active))
            .route("/list/select", web::get().to(list_select))
            .route("", web::get().to(list_brands))
            .route("/", web::get().to(list_brands))
            .route("/delete/{id}", web::delete().to(delete_brand))
            .route("/{id}/active", web::put().to(set_brand_active))
            .route("/{id}", web::get().to(get_brand))
            .route("/{id}", web::put().to(update_brand)),
    );
}
