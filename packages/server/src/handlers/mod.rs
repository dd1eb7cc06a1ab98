pub mod auth;
pub mod feed;
pub mod health;
pub mod users;
pub mod videos;
