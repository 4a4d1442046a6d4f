use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CartItemStatus, MerchantStatus, ReviewStatus, Role};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::merchant::apply,
        handlers::merchant::search,
        handlers::merchant::list,
        handlers::merchant::set_active,
        handlers::merchant::approve,
        handlers::merchant::reject,
        handlers::merchant::signup,
        handlers::merchant::delete,
        handlers::brand::add_brand,
        handlers::brand::list_active,
        handlers::brand::list_brands,
        handlers::brand::list_select,
        handlers::brand::get_brand,
        handlers::brand::update_brand,
        handlers::brand::set_brand_active,
        handlers::brand::delete_brand,
        handlers::category::add_category,
        handlers::category::list_active,
        handlers::category::list_all,
        handlers::category::get_category,
        handlers::category::update_category,
        handlers::category::set_category_active,
        handlers::category::delete_category,
        handlers::product::get_by_slug,
        handlers::product::search_by_name,
        handlers::product::catalog,
        handlers::product::list_select,
        handlers::product::add_product,
        handlers::product::list_products,
        handlers::product::get_product,
        handlers::product::update_product,
        handlers::product::set_product_active,
        handlers::product::delete_product,
        handlers::review::add_review,
        handlers::review::list_reviews,
        handlers::review::product_reviews,
        handlers::review::update_review,
        handlers::review::approve_review,
        handlers::review::reject_review,
        handlers::review::delete_review,
        handlers::user::search_users,
        handlers::user::list_users,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::shopping::upsert_wishlist,
        handlers::shopping::list_wishlist,
        handlers::shopping::add_address,
        handlers::shopping::list_addresses,
        handlers::shopping::get_address,
        handlers::shopping::update_address,
        handlers::shopping::delete_address,
        handlers::shopping::add_contact,
        handlers::shopping::add_cart,
        handlers::shopping::delete_cart,
        handlers::order::add_order,
        handlers::order::my_orders,
    ),
    components(
        schemas(
            Role,
            MerchantStatus,
            ReviewStatus,
            CartItemStatus,
            SuccessResponse,
            ApiError,
            ErrorResponse,
            ActiveUpdate,
            NameOnly,
            PageMeta,
            UserResponse,
            UserProfileResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ProfileUpdate,
            ProfileUpdateBody,
            MerchantResponse,
            MerchantWithBrand,
            MerchantApplyRequest,
            MerchantActiveBody,
            MerchantSignupRequest,
            BrandResponse,
            BrandSummary,
            MerchantName,
            BrandListItem,
            BrandCreateRequest,
            BrandUpdate,
            BrandUpdateBody,
            BrandActiveBody,
            CategoryResponse,
            CategoryCreateRequest,
            CategoryUpdate,
            CategoryUpdateBody,
            CategoryActiveBody,
            ProductResponse,
            ProductWithBrand,
            ProductSearchItem,
            CatalogItem,
            ProductCreateRequest,
            ProductUpdate,
            ProductUpdateBody,
            ProductActiveBody,
            ReviewResponse,
            ReviewAuthor,
            ReviewProduct,
            ReviewListItem,
            ReviewCreateRequest,
            ReviewUpdate,
            WishlistRequest,
            WishlistResponse,
            WishlistItem,
            AddressRequest,
            AddressResponse,
            ContactRequest,
            ContactResponse,
            CartItemInput,
            CartAddRequest,
            CartItemResponse,
            CartResponse,
            OrderAddRequest,
            OrderResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "merchant", description = "Merchant applications and onboarding"),
        (name = "brand", description = "Brand management"),
        (name = "category", description = "Category management"),
        (name = "product", description = "Products and storefront catalogue"),
        (name = "review", description = "Product reviews and moderation"),
        (name = "user", description = "User accounts"),
        (name = "wishlist", description = "Wishlist"),
        (name = "address", description = "Shipping addresses"),
        (name = "contact", description = "Contact form"),
        (name = "cart", description = "Shopping cart"),
        (name = "order", description = "Orders"),
    ),
    info(
        title = "Marketplace Backend API",
        version = "1.0.0",
        description = "Multi-vendor marketplace REST API documentation"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
