use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use crate::middlewares::CurrentUser;
use crate::models::*;
use crate::services::OrderService;

#[utoipa::path(
    post,
    path = "/api/order/add",
    tag = "order",
    request_body = OrderAddRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order placed", body = OrderResponse),
        (status = 404, description = "Cart not found for the caller", body = ErrorResponse)
    )
)]
pub async fn add_order(
    order_service: web::Data<OrderService>,
    user: CurrentUser,
    request: web::Json<OrderAddRequest>,
) -> Result<HttpResponse> {
    match order_service.add_order(&user, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Your order has been placed successfully!",
            "order": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/order/me",
    tag = "order",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own orders, paginated"))
)]
pub async fn my_orders(
    order_service: web::Data<OrderService>,
    user: CurrentUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match order_service.my_orders(&user, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page.to_json("orders"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/order")
            .route("/add", web::post().to(add_order))
            .route("/me", web::get().to(my_orders)),
    );
}
