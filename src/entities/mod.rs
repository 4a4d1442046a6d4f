pub mod addresses;
pub mod brands;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod category_products;
pub mod contacts;
pub mod merchants;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wishlists;

pub use cart_items::CartItemStatus;
pub use merchants::MerchantStatus;
pub use reviews::ReviewStatus;
pub use users::Role;

pub use addresses as address_entity;
pub use brands as brand_entity;
pub use cart_items as cart_item_entity;
pub use carts as cart_entity;
pub use categories as category_entity;
pub use category_products as category_product_entity;
pub use contacts as contact_entity;
pub use merchants as merchant_entity;
pub use orders as order_entity;
pub use products as product_entity;
pub use reviews as review_entity;
pub use users as user_entity;
pub use wishlists as wishlist_entity;
