//! 收藏、地址、联系表单与购物车

use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::{AddressService, CartService, ContactService, WishlistService};

#[utoipa::path(
    post,
    path = "/api/wishlist",
    tag = "wishlist",
    request_body = WishlistRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wishlist entry stored", body = WishlistResponse),
        (status = 404, description = "Unknown product", body = ErrorResponse)
    )
)]
pub async fn upsert_wishlist(
    wishlist_service: web::Data<WishlistService>,
    user: CurrentUser,
    request: web::Json<WishlistRequest>,
) -> Result<HttpResponse> {
    match wishlist_service.upsert(&user, request.into_inner()).await {
        Ok(wishlist) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Your Wishlist has been updated successfully!",
            "wishlist": wishlist
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Liked products", body = [WishlistItem]))
)]
pub async fn list_wishlist(
    wishlist_service: web::Data<WishlistService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match wishlist_service.liked(&user).await {
        Ok(wishlist) => Ok(HttpResponse::Ok().json(json!({ "wishlist": wishlist }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/address/add",
    tag = "address",
    request_body = AddressRequest,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Address added", body = AddressResponse))
)]
pub async fn add_address(
    address_service: web::Data<AddressService>,
    user: CurrentUser,
    request: web::Json<AddressRequest>,
) -> Result<HttpResponse> {
    match address_service.add_address(&user, request.into_inner()).await {
        Ok(address) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Address has been added successfully!",
            "address": address
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/address",
    tag = "address",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own addresses", body = [AddressResponse]))
)]
pub async fn list_addresses(
    address_service: web::Data<AddressService>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    match address_service.list_addresses(&user).await {
        Ok(addresses) => Ok(HttpResponse::Ok().json(json!({ "addresses": addresses }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/address/{id}",
    tag = "address",
    params(("id" = i64, Path, description = "Address id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Address", body = AddressResponse),
        (status = 404, description = "Unknown address", body = ErrorResponse)
    )
)]
pub async fn get_address(
    address_service: web::Data<AddressService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match address_service.get_address(&user, path.into_inner()).await {
        Ok(address) => Ok(HttpResponse::Ok().json(json!({ "address": address }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/address/{id}",
    tag = "address",
    request_body = AddressRequest,
    params(("id" = i64, Path, description = "Address id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Address updated", body = AddressResponse))
)]
pub async fn update_address(
    address_service: web::Data<AddressService>,
    user: CurrentUser,
    path: web::Path<i64>,
    request: web::Json<AddressRequest>,
) -> Result<HttpResponse> {
    match address_service
        .update_address(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(address) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Address has been updated successfully!",
            "address": address
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/address/delete/{id}",
    tag = "address",
    params(("id" = i64, Path, description = "Address id")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Address deleted", body = AddressResponse))
)]
pub async fn delete_address(
    address_service: web::Data<AddressService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match address_service.delete_address(&user, path.into_inner()).await {
        Ok(address) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Address has been deleted successfully!",
            "address": address
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/contact/add",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message received", body = ContactResponse),
        (status = 400, description = "Missing field", body = ErrorResponse)
    )
)]
pub async fn add_contact(
    contact_service: web::Data<ContactService>,
    request: web::Json<ContactRequest>,
) -> Result<HttpResponse> {
    match contact_service.add_contact(request.into_inner()).await {
        Ok(contact) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!(
                "We received your message, we will reach you on your email address {}!",
                contact.email
            ),
            "contact": contact
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    tag = "cart",
    request_body = CartAddRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart created with priced items", body = CartResponse),
        (status = 404, description = "Unknown product", body = ErrorResponse)
    )
)]
pub async fn add_cart(
    cart_service: web::Data<CartService>,
    user: CurrentUser,
    request: web::Json<CartAddRequest>,
) -> Result<HttpResponse> {
    match cart_service.add_cart(&user, request.into_inner()).await {
        Ok(cart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "cartId": cart.id,
            "cart": cart
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/cart/delete/{id}",
    tag = "cart",
    params(("id" = i64, Path, description = "Cart id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart deleted", body = SuccessResponse),
        (status = 404, description = "Cart not found for the caller", body = ErrorResponse)
    )
)]
pub async fn delete_cart(
    cart_service: web::Data<CartService>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match cart_service.delete_cart(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn wishlist_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wishlist")
            .route("", web::post().to(upsert_wishlist))
            .route("/", web::post().to(upsert_wishlist))
            .route("", web::get().to(list_wishlist))
            .route("/", web::get().to(list_wishlist)),
    );
}

pub fn address_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/address")
            .route("/add", web::post().to(add_address))
            .route("", web::get().to(list_addresses))
            .route("/", web::get().to(list_addresses))
            .route("/delete/{id}", web::delete().to(delete_address))
            .route("/{id}", web::get().to(get_address))
            .route("/{id}", web::put().to(update_address)),
    );
}

pub fn contact_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/contact").route("/add", web::post().to(add_contact)));
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("/add", web::post().to(add_cart))
            .route("/delete/{id}", web::delete().to(delete_cart)),
    );
}
