pub mod core;
pub mod models;
pub mod storage;
pub mod stores;
pub mod session;
pub mod events;
pub mod validation;
pub mod console;
