use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A directed follow edge: `follower_id` follows `following_id`.
///
/// The relation carries no FK relations on purpose; it is addressed by
/// follower for writes and deletes and queried by either column.
/// Uniqueness of the ordered pair is enforced by an index ensured at
/// startup (see `seed::ensure_indexes`).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub follower_id: Uuid,

    #[sea_orm(indexed)]
    pub following_id: Uuid,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
