pub mod address_service;
pub mod auth_service;
pub mod brand_service;
pub mod cart_service;
pub mod category_service;
pub mod contact_service;
pub mod merchant_service;
pub mod order_service;
pub mod product_service;
pub mod review_service;
pub mod scope;
pub mod user_service;
pub mod wishlist_service;

pub use address_service::*;
pub use auth_service::*;
pub use brand_service::*;
pub use cart_service::*;
pub use category_service::*;
pub use contact_service::*;
pub use merchant_service::*;
pub use order_service::*;
pub use product_service::*;
pub use review_service::*;
pub use scope::*;
pub use user_service::*;
pub use wishlist_service::*;

use crate::config::AppConfig;
use crate::external::Mailer;
use crate::utils::JwtService;
use actix_web::web;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// 所有服务句柄，按 worker 克隆后注册为 app_data
#[derive(Clone)]
pub struct Services {
    pub pool: DatabaseConnection,
    pub auth: AuthService,
    pub merchant: MerchantService,
    pub brand: BrandService,
    pub category: CategoryService,
    pub product: ProductService,
    pub review: ReviewService,
    pub user: UserService,
    pub wishlist: WishlistService,
    pub address: AddressService,
    pub contact: ContactService,
    pub cart: CartService,
    pub order: OrderService,
}

impl Services {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        mailer: Arc<dyn Mailer>,
        app: &AppConfig,
    ) -> Self {
        Self {
            auth: AuthService::new(pool.clone(), jwt_service),
            merchant: MerchantService::new(pool.clone(), mailer, app.public_url.clone()),
            brand: BrandService::new(pool.clone()),
            category: CategoryService::new(pool.clone()),
            product: ProductService::new(pool.clone()),
            review: ReviewService::new(pool.clone()),
            user: UserService::new(pool.clone()),
            wishlist: WishlistService::new(pool.clone()),
            address: AddressService::new(pool.clone()),
            contact: ContactService::new(pool.clone()),
            cart: CartService::new(pool.clone(), app.tax_rate),
            order: OrderService::new(pool.clone()),
            pool,
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.pool.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.merchant.clone()))
            .app_data(web::Data::new(self.brand.clone()))
            .app_data(web::Data::new(self.category.clone()))
            .app_data(web::Data::new(self.product.clone()))
            .app_data(web::Data::new(self.review.clone()))
            .app_data(web::Data::new(self.user.clone()))
            .app_data(web::Data::new(self.wishlist.clone()))
            .app_data(web::Data::new(self.address.clone()))
            .app_data(web::Data::new(self.contact.clone()))
            .app_data(web::Data::new(self.cart.clone()))
            .app_data(web::Data::new(self.order.clone()));
    }
}
