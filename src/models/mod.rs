pub mod notification;
pub mod user;
