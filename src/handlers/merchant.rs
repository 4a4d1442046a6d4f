use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::MerchantService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/merchant/add",
    tag = "merchant",
    request_body = MerchantApplyRequest,
    responses(
        (status = 200, description = "Application received", body = MerchantResponse),
        (status = 400, description = "Missing field or duplicate email", body = ErrorResponse)
    )
)]
pub async fn apply(
    merchant_service: web::Data<MerchantService>,
    request: web::Json<MerchantApplyRequest>,
) -> Result<HttpResponse> {
    match merchant_service.apply(request.into_inner()).await {
        Ok(merchant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!(
                "We received your request! we will reach you on your phone number {}!",
                merchant.phone_number
            ),
            "merchant": merchant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/merchant/search",
    tag = "merchant",
    params(SearchQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Matching merchants", body = [MerchantWithBrand]),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn search(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let term = query.into_inner().search.unwrap_or_default();
    match merchant_service.search(&user, &term).await {
        Ok(merchants) => Ok(HttpResponse::Ok().json(json!({ "merchants": merchants }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/merchant",
    tag = "merchant",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated merchants with their brand"),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn list(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match merchant_service.list(&user, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page.to_json("merchants"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/merchant/{id}/active",
    tag = "merchant",
    request_body = MerchantActiveBody,
    params(("id" = i64, Path, description = "Merchant id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Merchant updated", body = SuccessResponse),
        (status = 404, description = "Unknown merchant", body = ErrorResponse)
    )
)]
pub async fn set_active(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<MerchantActiveBody>,
) -> Result<HttpResponse> {
    let is_active = body.merchant.is_active;
    match merchant_service.set_active(&user, path.into_inner(), is_active).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/merchant/approve/{id}",
    tag = "merchant",
    params(("id" = i64, Path, description = "Merchant id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Merchant approved", body = SuccessResponse),
        (status = 404, description = "Unknown merchant", body = ErrorResponse)
    )
)]
pub async fn approve(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    path: web::Path<i64>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let host = req.connection_info().host().to_string();
    match merchant_service.approve(&user, path.into_inner(), &host).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/merchant/reject/{id}",
    tag = "merchant",
    params(("id" = i64, Path, description = "Merchant id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Merchant rejected", body = SuccessResponse),
        (status = 404, description = "Unknown merchant", body = ErrorResponse)
    )
)]
pub async fn reject(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match merchant_service.reject(&user, path.into_inner()).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/merchant/signup/{token}",
    tag = "merchant",
    request_body = MerchantSignupRequest,
    params(("token" = String, Path, description = "Signup token from the approval email")),
    responses(
        (status = 200, description = "Signup completed", body = SuccessResponse),
        (status = 401, description = "Token does not match", body = ErrorResponse)
    )
)]
pub async fn signup(
    merchant_service: web::Data<MerchantService>,
    path: web::Path<String>,
    request: web::Json<MerchantSignupRequest>,
) -> Result<HttpResponse> {
    match merchant_service
        .complete_signup(&path.into_inner(), request.into_inner())
        .await
    {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/merchant/delete/{id}",
    tag = "merchant",
    params(("id" = i64, Path, description = "Merchant id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Merchant deleted", body = MerchantResponse),
        (status = 404, description = "Unknown merchant", body = ErrorResponse)
    )
)]
pub async fn delete(
    merchant_service: web::Data<MerchantService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match merchant_service.delete(&user, path.into_inner()).await {
        Ok(merchant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Merchant has been deleted successfully!",
            "merchant": merchant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn merchant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/merchant")
            .route("/add", web::post().to(apply))
            .route("/search", web::get().to(search))
            .route("", web::get().to(list))
            .route("/", web::get().to(list))
            .route("/approve/{id}", web::put().to(approve))
            .route("/reject/{id}", web::put().to(reject))
            .route("/signup/{token}", web::post().to(signup))
            .route("/delete/{id}", web::delete().to(delete))
            .route("/{id}/active", web::put().to(set_active)),
    );
}
