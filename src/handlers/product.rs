use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::ProductService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/product/item/{slug}",
    tag = "product",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product with its brand", body = ProductWithBrand),
        (status = 404, description = "Unknown or hidden product", body = ErrorResponse)
    )
)]
pub async fn get_by_slug(
    product_service: web::Data<ProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match product_service.get_by_slug(&path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/product/list/search/{name}",
    tag = "product",
    params(("name" = String, Path, description = "Part of the product name")),
    responses(
        (status = 200, description = "Matching products", body = [ProductSearchItem]),
        (status = 404, description = "Nothing matched", body = ErrorResponse)
    )
)]
pub async fn search_by_name(
    product_service: web::Data<ProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match product_service.search_by_name(&path.into_inner()).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({ "products": products }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 店面目录，登录用户额外返回 isLiked
#[utoipa::path(
    get,
    path = "/api/product/list",
    tag = "product",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Paginated catalogue", body = [CatalogItem]),
        (status = 400, description = "Invalid sort order", body = ErrorResponse)
    )
)]
pub async fn catalog(
    product_service: web::Data<ProductService>,
    user: Option<CurrentUser>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse> {
    match product_service.catalog(&query, user.as_ref()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page.to_json("products"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/product/list/select",
    tag = "product",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Product names", body = [NameOnly]))
)]
pub async fn list_select(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match product_service.list_select(&user).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({ "products": products }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/product/add",
    tag = "product",
    request_body = ProductCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing field or sku in use", body = ErrorResponse),
        (status = 403, description = "Admin or merchant only", body = ErrorResponse)
    )
)]
pub async fn add_product(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
    request: web::Json<ProductCreateRequest>,
) -> Result<HttpResponse> {
    match product_service.add_product(&user, request.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product has been added successfully!",
            "product": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/product",
    tag = "product",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Products visible to the caller", body = [ProductWithBrand]))
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match product_service.list_products(&user).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({ "products": products }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product", body = ProductWithBrand),
        (status = 404, description = "Unknown product or outside the caller's brand", body = ErrorResponse)
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match product_service.get_product(&user, path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/product/{id}",
    tag = "product",
    request_body = ProductUpdateBody,
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = SuccessResponse),
        (status = 400, description = "Sku or slug in use", body = ErrorResponse)
    )
)]
pub async fn update_product(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<ProductUpdateBody>,
) -> Result<HttpResponse> {
    match product_service
        .update_product(&user, path.into_inner(), body.into_inner().product)
        .await
    {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product has been updated successfully!",
            "product": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/product/{id}/active",
    tag = "product",
    request_body = ProductActiveBody,
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Product updated", body = SuccessResponse))
)]
pub async fn set_product_active(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<ProductActiveBody>,
) -> Result<HttpResponse> {
    let is_active = body.product.is_active;
    match product_service
        .set_product_active(&user, path.into_inner(), is_active)
        .await
    {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product has been updated successfully!"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/product/delete/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product deleted", body = ProductResponse),
        (status = 404, description = "Unknown product", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match product_service.delete_product(&user, path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product has been deleted successfully!",
            "product": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .route("/item/{slug}", web::get().to(get_by_slug))
            .route("/list/search/{name}", web::get().to(search_by_name))
            .route("/list/select", web::get().to(list_select))
            .route("/list", web::get().to(catalog))
            .route("/add", web::post().to(add_product))
            .route("", web::get().to(list_products))
            .route("/", web::get().to(list_products))
            .route("/delete/{id}", web::delete().to(delete_product))
            .route("/{id}/active", web::put().to(set_product_active))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product)),
    );
}
