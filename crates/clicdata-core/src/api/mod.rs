pub mod auth;
pub mod client;
pub mod models;
pub mod pagination;
pub mod request;
pub mod session;
