pub mod email;
pub mod jwt;
pub mod password;
pub mod slug;
pub mod token;

pub use email::*;
pub use jwt::*;
pub use password::*;
pub use slug::*;
pub use token::generate_reset_token;
