pub mod mail;
pub mod mailgun;

pub use mail::*;
pub use mailgun::*;
