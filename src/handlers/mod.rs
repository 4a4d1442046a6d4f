pub mod auth;
pub mod brand;
pub mod category;
pub mod merchant;
pub mod order;
pub mod product;
pub mod review;
pub mod shopping;
pub mod user;

pub use auth::auth_config;
pub use brand::brand_config;
pub use category::category_config;
pub use merchant::merchant_config;
pub use order::order_config;
pub use product::product_config;
pub use review::review_config;
pub use shopping::{address_config, cart_config, contact_config, wishlist_config};
pub use user::user_config;

use crate::error::AppError;
use actix_web::{ResponseError, error::InternalError, web};

/// 请求体、查询串、路径参数解析失败统一返回 400 JSON
fn bad_input(message: String) -> actix_web::Error {
    let err = AppError::ValidationError(message);
    let response = err.error_response();
    InternalError::from_response(err, response).into()
}

/// 挂载在 `/api` 下的全部路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_input(err.to_string())))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_input(err.to_string())))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_input(err.to_string())))
        .configure(auth_config)
        .configure(merchant_config)
        .configure(brand_config)
        .configure(category_config)
        .configure(product_config)
        .configure(review_config)
        .configure(user_config)
        .configure(wishlist_config)
        .configure(address_config)
        .configure(contact_config)
        .configure(cart_config)
        .configure(order_config);
}
