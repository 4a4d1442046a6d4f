use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::UserService;

#[utoipa::path(
    get,
    path = "/api/user/search",
    tag = "user",
    params(SearchQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Matching users", body = [UserResponse]),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn search_users(
    user_service: web::Data<UserService>,
    user: CurrentUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let term = query.into_inner().search.unwrap_or_default();
    match user_service.search_users(&user, &term).await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({ "users": users }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "user",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated users"),
        (status = 403, description = "Admin only", body = ErrorResponse)
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
    user: CurrentUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match user_service.list_users(&user, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page.to_json("users"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "user",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile with merchant and brand", body = UserProfileResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match user_service.get_profile(&user).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({ "user": profile }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/user",
    tag = "user",
    request_body = ProfileUpdateBody,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Profile updated", body = UserResponse))
)]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    user: CurrentUser,
    body: web::Json<ProfileUpdateBody>,
) -> Result<HttpResponse> {
    match user_service
        .update_profile(&user, body.into_inner().profile)
        .await
    {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Your profile is successfully updated!",
            "user": updated
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/search", web::get().to(search_users))
            .route("/me", web::get().to(get_profile))
            .route("", web::get().to(list_users))
            .route("/", web::get().to(list_users))
            .route("", web::put().to(update_profile))
            .route("/", web::put().to(update_profile)),
    );
}
