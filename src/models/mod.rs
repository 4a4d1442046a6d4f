pub mod brand;
pub mod category;
pub mod common;
pub mod merchant;
pub mod pagination;
pub mod product;
pub mod review;
pub mod shopping;
pub mod user;

pub use brand::*;
pub use category::*;
pub use common::*;
pub use merchant::*;
pub use pagination::*;
pub use product::*;
pub use review::*;
pub use shopping::*;
pub use user::*;
