pub mod article;
pub mod auth;
