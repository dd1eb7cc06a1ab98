pub mod follow;
pub mod user;
pub mod video;
