//! Thin persistence layers over the external database.
//!
//! Each store borrows a connection and holds no state of its own;
//! every read is a fresh query. Business rules live one level up, in
//! the follow graph and feed services.

pub mod follows;
pub mod users;
pub mod videos;
