pub mod directory;
pub mod notification_store;
